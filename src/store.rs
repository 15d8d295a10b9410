use crate::db;
use crate::model::{Course, NewCourse, NewResult, NewStudent, ResultRecord, Student};
use anyhow::anyhow;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Owns the three collections. Every create is a single `INSERT`; listings
/// come back in insertion order.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(db_path: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            conn: Mutex::new(db::open_db(db_path)?),
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self {
            conn: Mutex::new(db::open_in_memory()?),
        })
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("store connection lock poisoned"))
    }

    pub fn insert_student(&self, new: &NewStudent) -> anyhow::Result<Student> {
        let student = Student {
            id: Uuid::new_v4().to_string(),
            first_name: new.first_name.clone(),
            family_name: new.family_name.clone(),
            date_of_birth: new.date_of_birth,
        };
        self.conn()?.execute(
            "INSERT INTO students(id, first_name, family_name, date_of_birth) VALUES(?, ?, ?, ?)",
            (
                &student.id,
                &student.first_name,
                &student.family_name,
                student.date_of_birth.format(DATE_FORMAT).to_string(),
            ),
        )?;
        Ok(student)
    }

    pub fn insert_course(&self, new: &NewCourse) -> anyhow::Result<Course> {
        let course = Course {
            id: Uuid::new_v4().to_string(),
            course_name: new.course_name.clone(),
        };
        self.conn()?.execute(
            "INSERT INTO courses(id, course_name) VALUES(?, ?)",
            (&course.id, &course.course_name),
        )?;
        Ok(course)
    }

    pub fn insert_result(&self, new: &NewResult) -> anyhow::Result<ResultRecord> {
        let result = ResultRecord {
            id: Uuid::new_v4().to_string(),
            student_ref: new.student_ref.clone(),
            course_ref: new.course_ref.clone(),
            score: new.score.clone(),
        };
        self.conn()?.execute(
            "INSERT INTO results(id, student_id, course_id, score) VALUES(?, ?, ?, ?)",
            (
                &result.id,
                &result.student_ref,
                &result.course_ref,
                &result.score,
            ),
        )?;
        Ok(result)
    }

    pub fn list_students(&self) -> anyhow::Result<Vec<Student>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, first_name, family_name, date_of_birth
             FROM students
             ORDER BY rowid",
        )?;
        let students = stmt
            .query_map([], |row| {
                let raw_dob: String = row.get(3)?;
                let date_of_birth = NaiveDate::parse_from_str(&raw_dob, DATE_FORMAT)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                    })?;
                Ok(Student {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    family_name: row.get(2)?,
                    date_of_birth,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(students)
    }

    pub fn list_courses(&self) -> anyhow::Result<Vec<Course>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, course_name FROM courses ORDER BY rowid")?;
        let courses = stmt
            .query_map([], |row| {
                Ok(Course {
                    id: row.get(0)?,
                    course_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    pub fn list_results(&self) -> anyhow::Result<Vec<ResultRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, student_id, course_id, score
             FROM results
             ORDER BY rowid",
        )?;
        let results = stmt
            .query_map([], |row| {
                Ok(ResultRecord {
                    id: row.get(0)?,
                    student_ref: row.get(1)?,
                    course_ref: row.get(2)?,
                    score: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }

    /// Number of results whose course reference equals `course_id`.
    /// Served by `idx_results_course`.
    pub fn count_results_for_course(&self, course_id: &str) -> anyhow::Result<i64> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM results WHERE course_id = ?",
            [course_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn student_exists(&self, id: &str) -> anyhow::Result<bool> {
        let found: Option<i64> = self
            .conn()?
            .query_row("SELECT 1 FROM students WHERE id = ?", [id], |r| r.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    pub fn course_exists(&self, id: &str) -> anyhow::Result<bool> {
        let found: Option<i64> = self
            .conn()?
            .query_row("SELECT 1 FROM courses WHERE id = ?", [id], |r| r.get(0))
            .optional()?;
        Ok(found.is_some())
    }
}
