//! Versioned schema migrations for the baton store.

use super::schema;
use rusqlite::{Connection, types::Type};

/// Latest schema version understood by this binary.
pub const LATEST_SCHEMA_VERSION: u32 = 2;

struct Migration {
    version: u32,
    sql: &'static str,
}

/// Ascending by version; `migrate` relies on the ordering.
const MIGRATIONS: [Migration; 2] = [
    Migration {
        version: 1,
        sql: schema::MIGRATION_V1_SQL,
    },
    Migration {
        version: 2,
        sql: schema::MIGRATION_V2_SQL,
    },
];

/// Read `PRAGMA user_version` as a Rust `u32`.
///
/// # Errors
///
/// Returns an error if querying SQLite fails or the stored value cannot be
/// represented as `u32`.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(raw).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
    })
}

/// Apply every migration newer than the store's `user_version`, each in its
/// own transaction, and return the resulting version. Re-running is a no-op;
/// the DDL is `IF NOT EXISTS`-safe on top of the version gate.
///
/// # Errors
///
/// Returns an error if any migration fails.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<u32> {
    let start = current_schema_version(conn)?;
    let mut version = start;

    for migration in MIGRATIONS.iter().skip_while(|m| m.version <= start) {
        apply(conn, migration)?;
        version = migration.version;
    }

    Ok(version)
}

fn apply(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", i64::from(migration.version))?;
    tx.execute(
        "UPDATE store_meta SET schema_version = ?1 WHERE id = 1",
        [i64::from(migration.version)],
    )?;
    tx.commit()
}
