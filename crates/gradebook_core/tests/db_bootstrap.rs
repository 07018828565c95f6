use gradebook_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_grades_table() {
    let conn = open_db_in_memory().unwrap();

    assert_table_exists(&conn, "grades");
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn reopening_file_database_keeps_rows_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradebook.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO grades (student_no, name, subject, score) VALUES ('S1', 'Alice', 'Math', 90);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_table_exists(&conn_second, "grades");
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM grades;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn bootstrap_tolerates_preexisting_grades_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE grades (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_no TEXT,
            name TEXT NOT NULL,
            subject TEXT NOT NULL,
            score REAL NOT NULL CHECK(score >= 0 AND score <= 100),
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        INSERT INTO grades (student_no, name, subject, score) VALUES (NULL, 'Bob', 'Art', 70);",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM grades;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_twice_on_one_file_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO grades (name, subject, score) VALUES ('Eve', 'Math', 55);",
            [],
        )
        .unwrap();
    let second = open_db(&path).unwrap();

    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM grades;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn non_database_file_fails_schema_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Bootstrap(_)), "unexpected error: {err}");
}

#[test]
fn missing_parent_directory_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("gradebook.sqlite3");

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::Open { target, .. } => assert!(target.ends_with("gradebook.sqlite3")),
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
