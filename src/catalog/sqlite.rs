//! SQLite-backed catalog: open, schema, and the three queries the pipeline needs.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use super::Catalog;
use crate::CatalogItem;

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Insert statement for the items table.
const INSERT_ITEM_SQL: &str =
    "INSERT INTO items (id, path, ordinal, plays) VALUES (?1, ?2, ?3, ?4)";

/// Schema for the items table. `path` is deliberately not UNIQUE: dedup is the
/// pipeline's existence check, and a racing duplicate insert is accepted
/// behavior rather than a constraint violation.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    path TEXT NOT NULL,
    ordinal INTEGER NOT NULL,
    plays INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_items_path ON items(path);
"#;

/// Catalog backed by a single rusqlite connection. The connection is not
/// Sync, so all access is serialized through one mutex; every digester
/// clones the same `Arc<SqliteCatalog>`.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(())
}

impl SqliteCatalog {
    /// Open or create the catalog DB and ensure schema + WAL.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("open catalog database")?;
        apply_wal_and_schema(&conn)?;
        Ok(SqliteCatalog {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory catalog with the same schema (no WAL pragmas needed).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory catalog")?;
        conn.execute_batch(SCHEMA).context("create schema")?;
        Ok(SqliteCatalog {
            conn: Mutex::new(conn),
        })
    }

    /// All rows as (path, ordinal), for inspection and tests.
    pub fn all_items(&self) -> Result<Vec<(String, u32)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT path, ordinal FROM items ORDER BY ordinal")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }
}

impl Catalog for SqliteCatalog {
    fn count_by_path(&self, path: &Path) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM items WHERE path = ?1",
                [path.to_string_lossy().as_ref()],
                |row| row.get(0),
            )
            .context("count items by path")?;
        Ok(count.max(0) as u64)
    }

    fn insert(&self, item: &CatalogItem) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            INSERT_ITEM_SQL,
            (
                item.id.as_str(),
                item.path.as_str(),
                item.ordinal,
                item.plays,
            ),
        )
        .context("insert item")?;
        Ok(())
    }

    fn max_ordinal(&self) -> Result<Option<u32>> {
        let conn = self.conn.lock().unwrap();
        let max: Option<u32> = conn
            .query_row("SELECT MAX(ordinal) FROM items", [], |row| row.get(0))
            .context("query max ordinal")?;
        Ok(max)
    }
}
