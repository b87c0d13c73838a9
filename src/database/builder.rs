//! # Database Builder
//!
//! Fluent configuration for opening a database: directory, the row-count
//! bound applied when loading snapshots, and the result-cache byte budget.
//!
//! ```ignore
//! let db = Database::builder()
//!     .path("./mydb")
//!     .max_row_count(1_000_000)
//!     .result_cache_bytes(64 * 1024)
//!     .open()?;
//! ```
//!
//! `open()` creates the directory if needed, loads `data.mdb` (upgrading an
//! old format version in place), and replays `data.wal`.

use std::fs;
use std::path::PathBuf;

use eyre::{Result, WrapErr};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use super::{Database, Shared, DEFAULT_MAX_ROW_COUNT};
use crate::cache::ResultCache;
use crate::schema::Catalog;
use crate::storage::{Snapshot, Wal, SNAPSHOT_FILE, WAL_FILE};

/// Builder for configuring and opening a [`Database`].
pub struct DatabaseBuilder {
    path: Option<PathBuf>,
    max_row_count: u64,
    result_cache_bytes: usize,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self {
            path: None,
            max_row_count: DEFAULT_MAX_ROW_COUNT,
            result_cache_bytes: 0,
        }
    }

    /// Database directory; defaults to the working directory.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Bound on rows loaded per table from a snapshot, guarding against
    /// pathological files.
    pub fn max_row_count(mut self, max: u64) -> Self {
        self.max_row_count = max;
        self
    }

    /// Result-cache byte budget; zero (the default) disables caching.
    pub fn result_cache_bytes(mut self, bytes: usize) -> Self {
        self.result_cache_bytes = bytes;
        self
    }

    /// Opens the database: load snapshot, upgrade if old, replay WAL.
    pub fn open(self) -> Result<Database> {
        let dir = self.path.unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("failed to create database directory {}", dir.display()))?;

        let db = Database {
            shared: Arc::new(Shared {
                catalog: RwLock::new(Catalog::new()),
                wal: Wal::new(dir.join(WAL_FILE)),
                snapshot: Snapshot::new(dir.join(SNAPSHOT_FILE), self.max_row_count),
                cache: Mutex::new(ResultCache::new(self.result_cache_bytes)),
                dir,
            }),
        };
        db.init()?;
        Ok(db)
    }
}
