//! Notes schema: ordered migrations plus a shape check on every open.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - All pending migrations apply in one transaction or not at all.
//! - An up-to-date database must still contain every table the store reads.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// Tables the DAO reads, with the columns it selects.
const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("notes", &["id", "title", "updated_at", "is_pinned"]),
    (
        "content_items",
        &["note_id", "content_type", "content", "position"],
    ),
];

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "notes_and_content_items",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "list_and_search_indexes",
        sql: include_str!("0002_list_indexes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the notes schema up to [`latest_version`] and checks its shape.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from)
        .collect();
    if !pending.is_empty() {
        let tx = conn.transaction()?;
        for migration in pending {
            debug!(
                "event=db_migrate_step module=db version={} name={}",
                migration.version, migration.name
            );
            tx.execute_batch(migration.sql)?;
            tx.pragma_update(None, "user_version", migration.version)?;
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from={from} to={latest}");
    }

    verify_schema(conn)
}

fn verify_schema(conn: &Connection) -> DbResult<()> {
    for &(table, columns) in REQUIRED_TABLES {
        let present: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .optional()?;
        if present.is_none() {
            return Err(DbError::SchemaMismatch {
                table,
                column: None,
            });
        }

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
        let actual = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(missing) = columns
            .iter()
            .copied()
            .find(|column| !actual.iter().any(|name| name.as_str() == *column))
        {
            return Err(DbError::SchemaMismatch {
                table,
                column: Some(missing),
            });
        }
    }
    Ok(())
}
