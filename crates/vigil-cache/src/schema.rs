use rusqlite::{Connection, OptionalExtension};

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i64 = 1;

// NOTE: There is no migration path. A store whose version marker is missing,
// unreadable or different from SCHEMA_VERSION is deleted and rebuilt; the
// cache only holds data that can be fetched again.

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema (
            version INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS relays (
            fingerprint TEXT PRIMARY KEY,
            address TEXT NOT NULL,
            or_port INTEGER NOT NULL,
            nickname TEXT NOT NULL
        );

        DELETE FROM schema;
        "#,
    )?;

    conn.execute("INSERT INTO schema (version) VALUES (?1)", [SCHEMA_VERSION])?;

    Ok(())
}

/// Reads the stored version marker. Any failure (missing table, corrupt file,
/// non-integer value) reads as `None`.
pub fn read_version(conn: &Connection) -> Option<i64> {
    conn.query_row("SELECT version FROM schema", [], |row| row.get::<_, i64>(0))
        .optional()
        .ok()
        .flatten()
}
