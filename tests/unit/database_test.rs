//! Unit tests for the smartmark database layer (connection + migrations).

use smartmark::database::{migrations, Database};

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_tables = ["users", "bookmarks", "schema_version"];

    for table in &expected_tables {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_owner_index() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
            ["idx_bookmarks_owner_created"],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "Owner/created index should exist after migrations");
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_reopen_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = dir.path().join("smartmark.db");

    {
        let db = Database::open(&path).expect("first open failed");
        db.connection()
            .execute(
                "INSERT INTO users (id, email, created_at) VALUES ('u1', 'ada@example.com', 1)",
                [],
            )
            .expect("insert failed");
    }

    // Re-opening runs migrations again without clobbering data
    let db = Database::open(&path).expect("second open failed");
    let count: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .expect("count failed");
    assert_eq!(count, 1);
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        migrations::CURRENT_SCHEMA_VERSION
    );
}
