use jot::db::{self, ENTRIES_KEY};
use jot::db::migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
use jot::db::KvStore;
use jot::journal::store::EntryStore;
use rusqlite::{params, Connection};
use tempfile::TempDir;

const LEGACY_BLOB: &str = r#"[
    {"id": "old-1", "content": "written before templates", "date": "2023-05-01T09:00:00Z", "wordCount": 3},
    {"id": "old-2", "content": "another old one", "date": "2023-04-01T09:00:00Z", "wordCount": 3}
]"#;

#[test]
fn fresh_db_migrates_to_current_version() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn migrations_are_idempotent() {
    let conn = db::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn v1_file_is_upgraded_on_open() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("journal.db");

    // Simulate a v1 database that hasn't been migrated
    {
        let conn = Connection::open(&db_path).unwrap();
        db::schema::init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, '2023-05-01T09:00:00Z')",
            params![ENTRIES_KEY, LEGACY_BLOB],
        )
        .unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    let kv = KvStore::open(&db_path).unwrap();
    let raw = kv.get(ENTRIES_KEY).unwrap().unwrap();
    let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for record in records.as_array().unwrap() {
        assert_eq!(record["isTemplate"], serde_json::Value::Bool(false));
        assert!(record["templateOrder"].is_null());
    }

    let store = EntryStore::load(kv).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.entries().iter().all(|e| !e.is_template()));
}
