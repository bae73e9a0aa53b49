//! Forward-only schema migration framework.
//!
//! Tracks the schema version in `schema_meta` and runs sequential migrations
//! to bring the database up to [`CURRENT_SCHEMA_VERSION`].

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::ENTRIES_KEY;

/// The schema version that the current binary expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Get the current schema version from the database.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().unwrap_or(0))
        },
    )
}

fn update_schema_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
        [version.to_string()],
    )?;
    Ok(())
}

/// Run any pending forward-only migrations. Each migration runs in a transaction.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let mut version = get_schema_version(conn)?;
    tracing::debug!(schema_version = version, target = CURRENT_SCHEMA_VERSION, "checking migrations");

    while version < CURRENT_SCHEMA_VERSION {
        let next = version + 1;
        tracing::info!(from = version, to = next, "running migration");

        let tx = conn.unchecked_transaction()?;
        match next {
            2 => migrate_v1_to_v2(&tx)?,
            _ => {
                tracing::error!(version = next, "unknown migration target");
                break;
            }
        }
        update_schema_version(&tx, next)?;
        tx.commit()?;
        version = next;
    }

    Ok(())
}

/// Migration v1 → v2: backfill `isTemplate` / `templateOrder` on entries written
/// before templates existed.
fn migrate_v1_to_v2(conn: &Connection) -> rusqlite::Result<()> {
    let blob: Option<String> = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![ENTRIES_KEY],
            |row| row.get(0),
        )
        .optional()?;

    let Some(blob) = blob else {
        return Ok(());
    };

    let mut records: Value = match serde_json::from_str(&blob) {
        Ok(v) => v,
        Err(e) => {
            // Leave it alone; the entry store reports the parse failure on load.
            tracing::warn!(error = %e, "entries blob is not valid JSON, skipping backfill");
            return Ok(());
        }
    };

    let mut backfilled = 0usize;
    if let Some(items) = records.as_array_mut() {
        for item in items.iter_mut() {
            if let Some(obj) = item.as_object_mut() {
                if !obj.contains_key("isTemplate") {
                    obj.insert("isTemplate".into(), Value::Bool(false));
                    backfilled += 1;
                }
                if !obj.contains_key("templateOrder") {
                    obj.insert("templateOrder".into(), Value::Null);
                }
            }
        }
    }

    if backfilled > 0 {
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE kv_store SET value = ?1, updated_at = ?2 WHERE key = ?3",
            params![records.to_string(), now, ENTRIES_KEY],
        )?;
        tracing::info!(backfilled, "backfilled template fields on legacy entries");
    }

    Ok(())
}
