use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Course,
    Result,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Student => "Student",
            EntityKind::Course => "Course",
            EntityKind::Result => "Result",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: NaiveDate,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.family_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub course_name: String,
}

/// A score a student obtained in a course. `student_ref` and `course_ref`
/// hold identifiers and are not guaranteed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    pub student_ref: String,
    pub course_ref: String,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub course_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResult {
    pub student_ref: String,
    pub course_ref: String,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub course_name: String,
    pub students_assigned: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub student_name: String,
    pub course_name: String,
    pub score: String,
}
