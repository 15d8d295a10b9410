use anyhow::Context;
use rusqlite::Connection;
use std::path::Path;

pub fn open_db(db_path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open database {}", db_path.to_string_lossy()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            family_name TEXT NOT NULL,
            date_of_birth TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses(
            id TEXT PRIMARY KEY,
            course_name TEXT NOT NULL
        )",
        [],
    )?;

    // No FOREIGN KEY constraints: a result may point at a student or course
    // that does not exist.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS results(
            id TEXT PRIMARY KEY,
            student_id TEXT NOT NULL,
            course_id TEXT NOT NULL,
            score TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_results_course ON results(course_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_results_student ON results(student_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .expect("prepare");
        stmt.query_map([], |row| row.get::<_, String>(0))
            .expect("query")
            .collect::<Result<Vec<_>, _>>()
            .expect("collect")
    }

    #[test]
    fn schema_creates_three_collections() {
        let conn = open_in_memory().expect("open");
        assert_eq!(table_names(&conn), vec!["courses", "results", "students"]);
    }

    #[test]
    fn schema_init_is_idempotent() {
        let conn = open_in_memory().expect("open");
        init_schema(&conn).expect("second init");
        assert_eq!(table_names(&conn).len(), 3);
    }
}
