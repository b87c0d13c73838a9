//! # Database Handle and Dispatcher
//!
//! `Database` is the single handle owning all process-wide state: the
//! catalog behind its RW lock, the WAL, the snapshot file, and the result
//! cache. Executors never touch globals; everything they need arrives
//! through the handle and a per-call [`Session`].
//!
//! ## Sessions
//!
//! A session bundles how a statement reaches the catalog and where its WAL
//! line goes:
//!
//! | Caller | Catalog access | WAL sink |
//! |--------|----------------|----------|
//! | `execute` | lock per statement | append to file |
//! | `Transaction::exec` | the transaction's held write guard | in-memory buffer |
//! | WAL replay | lock per statement | suppressed |
//!
//! ## Mutation Ordering
//!
//! Every mutating executor follows the same sequence: append the raw
//! statement to the WAL, validate and apply in memory, rewrite the
//! snapshot, truncate the WAL, clear the result cache. The WAL append comes
//! first — a statement that later fails validation stays in the log and
//! reproduces the same error on replay.
//!
//! ## Lock Order
//!
//! Catalog → table → WAL, released LIFO. File I/O happens while the
//! relevant lock is held; this engine accepts that simplification.

mod builder;
mod ddl;
mod dml;
mod dump;
mod query;
mod recovery;
mod transaction;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{bail, Result};
use parking_lot::{Mutex, RwLock};

use crate::cache::ResultCache;
use crate::schema::Catalog;
use crate::sql::ast::StatementKind;
use crate::sql::parser;
use crate::storage::{Snapshot, Wal};

pub use builder::DatabaseBuilder;
pub use transaction::Transaction;

/// Default bound on rows loaded per table from a snapshot.
pub const DEFAULT_MAX_ROW_COUNT: u64 = 10_000_000;

#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) catalog: RwLock<Catalog>,
    pub(crate) wal: Wal,
    pub(crate) snapshot: Snapshot,
    pub(crate) cache: Mutex<ResultCache>,
    pub(crate) dir: PathBuf,
}

/// Handle to one database directory. Cheap to clone; all clones share the
/// same catalog, WAL, snapshot, and cache.
#[derive(Clone, Debug)]
pub struct Database {
    pub(crate) shared: Arc<Shared>,
}

/// How an executor reaches the catalog.
pub(crate) enum CatalogAccess<'a> {
    /// Take the catalog lock per operation.
    Locked(&'a RwLock<Catalog>),
    /// A transaction already holds the catalog exclusively.
    Exclusive(&'a mut Catalog),
}

impl CatalogAccess<'_> {
    pub(crate) fn with_read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        match self {
            CatalogAccess::Locked(lock) => f(&lock.read()),
            CatalogAccess::Exclusive(catalog) => f(&**catalog),
        }
    }

    pub(crate) fn with_write<R>(&mut self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        match self {
            CatalogAccess::Locked(lock) => f(&mut lock.write()),
            CatalogAccess::Exclusive(catalog) => f(&mut **catalog),
        }
    }
}

/// Where a mutating statement's WAL line goes.
pub(crate) enum WalSink<'a> {
    /// Normal execution: append to the log file before mutating.
    File(&'a Wal),
    /// Transaction: defer to the in-memory buffer until commit.
    Buffer(&'a mut Vec<String>),
    /// Recovery: the statement is already in the log.
    Replay,
}

impl WalSink<'_> {
    pub(crate) fn log(&mut self, statement: &str) -> Result<()> {
        match self {
            WalSink::File(wal) => wal.append(statement),
            WalSink::Buffer(buffer) => {
                buffer.push(statement.to_string());
                Ok(())
            }
            WalSink::Replay => Ok(()),
        }
    }

    /// Removes the log after a successful snapshot save. Suppressed for
    /// transactions (commit truncates) and replay (recovery truncates).
    pub(crate) fn truncate(&mut self) -> Result<()> {
        match self {
            WalSink::File(wal) => wal.clear(),
            WalSink::Buffer(_) | WalSink::Replay => Ok(()),
        }
    }
}

/// Per-statement execution context.
pub(crate) struct Session<'a> {
    pub(crate) catalog: CatalogAccess<'a>,
    pub(crate) wal: WalSink<'a>,
}

impl Database {
    /// Opens (or creates) the database in `dir` with default settings,
    /// loading the snapshot and replaying the WAL.
    pub fn open(dir: impl AsRef<Path>) -> Result<Database> {
        Self::builder().path(dir.as_ref().to_path_buf()).open()
    }

    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Executes one statement and returns its response text.
    pub fn execute(&self, query: &str) -> Result<String> {
        let mut session = Session {
            catalog: CatalogAccess::Locked(&self.shared.catalog),
            wal: WalSink::File(&self.shared.wal),
        };
        self.dispatch(&mut session, query)
    }

    /// Synonym for [`execute`](Self::execute).
    pub fn handle_command(&self, query: &str) -> Result<String> {
        self.execute(query)
    }

    /// Replaces the result cache with one of the given byte budget.
    /// A zero budget disables result caching.
    pub fn init_cache(&self, byte_limit: usize) {
        *self.shared.cache.lock() = ResultCache::new(byte_limit);
    }

    /// The directory holding `data.mdb`, `data.wal`, and relative dumps.
    pub fn dir(&self) -> &Path {
        &self.shared.dir
    }

    pub(crate) fn dispatch(&self, session: &mut Session<'_>, query: &str) -> Result<String> {
        let query = query.trim();
        let Some(kind) = parser::classify(query) else {
            bail!("unsupported command");
        };
        match kind {
            StatementKind::CreateTable => self.execute_create_table(session, query),
            StatementKind::CreateIndex => self.execute_create_index(session, query),
            StatementKind::Insert => self.execute_insert(session, query),
            StatementKind::Update => self.execute_update(session, query),
            StatementKind::Select => self.execute_select(session, query),
            StatementKind::Dump => self.execute_dump(session, query),
        }
    }

    pub(crate) fn clear_cache(&self) {
        self.shared.cache.lock().clear();
    }
}
