//! Embedded schema migrations
//!
//! Every file under `migrations/` is compiled in and applied once, in
//! version order. Applied versions are tracked in `schema_migrations`.

use std::collections::BTreeSet;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, SqliteError};

/// One embedded schema step
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: &'static str,
    pub name: &'static str,
    sql: &'static str,
}

/// The full schema history, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "000",
        name: "create_schema_migrations",
        sql: include_str!("../migrations/000_create_schema_migrations.sql"),
    },
    Migration {
        version: "001",
        name: "create_candidates",
        sql: include_str!("../migrations/001_create_candidates.sql"),
    },
    Migration {
        version: "002",
        name: "create_topics",
        sql: include_str!("../migrations/002_create_topics.sql"),
    },
];

/// Bring the database up to the latest schema.
///
/// Also turns on foreign-key enforcement for this connection. Returns the
/// number of migrations applied; zero on an up-to-date database.
pub fn migrate(conn: &Connection) -> Result<usize> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    apply_all(conn, MIGRATIONS)
}

/// Versions already recorded; empty on a fresh database
pub fn applied_versions(conn: &Connection) -> Result<BTreeSet<String>> {
    let tracked = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'")?
        .exists([])?;
    if !tracked {
        return Ok(BTreeSet::new());
    }

    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<BTreeSet<String>>>()?;
    Ok(versions)
}

fn apply_all(conn: &Connection, migrations: &[Migration]) -> Result<usize> {
    let applied = applied_versions(conn)?;
    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|m| !applied.contains(m.version))
        .collect();

    for migration in &pending {
        apply(conn, migration)?;
    }
    if !pending.is_empty() {
        info!("Applied {} schema migrations", pending.len());
    }
    Ok(pending.len())
}

// Schema change and its bookkeeping row commit together
fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql).map_err(|e| {
        SqliteError::Migration(format!("{}_{}: {}", migration.version, migration.name, e))
    })?;
    tx.execute(
        "INSERT INTO schema_migrations (version, applied_at) VALUES (?, CURRENT_TIMESTAMP)",
        [migration.version],
    )?;
    tx.commit()?;
    debug!("Migration {}_{} applied", migration.version, migration.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")
            .unwrap()
            .exists([table])
            .unwrap()
    }

    #[test]
    fn fresh_database_gets_every_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(migrate(&conn).unwrap(), MIGRATIONS.len());

        for table in ["schema_migrations", "candidates", "topics"] {
            assert!(table_exists(&conn, table), "missing table {}", table);
        }
        let expected: BTreeSet<String> =
            MIGRATIONS.iter().map(|m| m.version.to_string()).collect();
        assert_eq!(applied_versions(&conn).unwrap(), expected);
    }

    #[test]
    fn second_run_applies_nothing() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(migrate(&conn).unwrap(), 0);
        assert_eq!(applied_versions(&conn).unwrap().len(), MIGRATIONS.len());
    }

    #[test]
    fn failed_step_is_rolled_back() {
        let conn = Connection::open_in_memory().unwrap();
        let broken = [
            MIGRATIONS[0],
            Migration {
                version: "900",
                name: "broken",
                sql: "CREATE TABLE half_done (id TEXT); INSERT INTO missing_table VALUES (1);",
            },
        ];

        let err = apply_all(&conn, &broken).unwrap_err();
        assert!(matches!(err, SqliteError::Migration(ref msg) if msg.starts_with("900_broken")));
        assert!(!table_exists(&conn, "half_done"));
        assert!(!applied_versions(&conn).unwrap().contains("900"));
    }
}
