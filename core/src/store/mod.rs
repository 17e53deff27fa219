//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Codecs hand record structs to store methods; they never execute SQL directly.

use crate::error::{SnapshotError, SnapshotResult};
use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::{Path, PathBuf};

mod saplings;
mod snags;
mod soil;
mod trees;

/// Full-landscape tables, rebuilt by every full save.
pub const LANDSCAPE_TABLES: [&str; 4] = ["trees", "soil", "snag", "saplings"];
/// Stand-scoped tables, created on the first stand save.
pub const STAND_TABLES: [&str; 2] = ["trees_stand", "saplings_stand"];

pub struct SnapshotStore {
    conn: Connection,
    path: Option<PathBuf>, // None for :memory:
}

impl SnapshotStore {
    /// Open (or create) a snapshot database for a full save.
    pub fn create(path: &Path) -> SnapshotResult<Self> {
        let conn = open_with(path, OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)?;
        Ok(Self { conn, path: Some(path.to_path_buf()) })
    }

    /// Open an existing snapshot for loading; a missing file is an error,
    /// never an empty database.
    pub fn open_read_only(path: &Path) -> SnapshotResult<Self> {
        let conn = open_with(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn, path: Some(path.to_path_buf()) })
    }

    /// Open (or create) a database for stand-scoped saves, creating the
    /// stand tables if they are not there yet.
    pub fn open_stand(path: &Path) -> SnapshotResult<Self> {
        let store = Self::create(path)?;
        if !store.has_stand_tables()? {
            log::debug!("snapshot: creating stand tables in {}", path.display());
            store
                .conn
                .execute_batch(include_str!("../../migrations/002_stand_snapshot.sql"))?;
        }
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SnapshotResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Start a write transaction. Dropping the writer without `commit()`
    /// rolls everything back.
    pub fn writer(&mut self) -> SnapshotResult<SnapshotWriter<'_>> {
        Ok(SnapshotWriter { tx: self.conn.transaction()? })
    }

    pub fn has_table(&self, name: &str) -> SnapshotResult<bool> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |r| r.get(0),
        )?;
        Ok(n > 0)
    }

    pub fn has_stand_tables(&self) -> SnapshotResult<bool> {
        for table in STAND_TABLES {
            if !self.has_table(table)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Row count of one of the snapshot tables; `None` if the table does
    /// not exist in this file.
    pub fn row_count(&self, table: &str) -> SnapshotResult<Option<i64>> {
        let known = LANDSCAPE_TABLES.contains(&table) || STAND_TABLES.contains(&table);
        if !known || !self.has_table(table)? {
            return Ok(None);
        }
        let n = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(Some(n))
    }
}

fn open_with(path: &Path, flags: OpenFlags) -> SnapshotResult<Connection> {
    Connection::open_with_flags(path, flags | OpenFlags::SQLITE_OPEN_NO_MUTEX).map_err(|source| {
        SnapshotError::StoreUnavailable { path: path.to_path_buf(), source }
    })
}

/// One write transaction against a snapshot database.
pub struct SnapshotWriter<'a> {
    tx: Transaction<'a>,
}

impl SnapshotWriter<'_> {
    /// Drop and recreate the full-landscape tables.
    pub fn reset_landscape_tables(&self) -> SnapshotResult<()> {
        self.tx
            .execute_batch(include_str!("../../migrations/001_landscape_snapshot.sql"))?;
        Ok(())
    }

    pub fn commit(self) -> SnapshotResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}
