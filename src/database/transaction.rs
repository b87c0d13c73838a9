//! # Transactions
//!
//! A transaction owns the catalog write lock for its whole lifetime, so no
//! other writer (and no reader taking the catalog lock) can interleave.
//! On begin it deep-clones the catalog as its rollback image; statements
//! then run against the *live* catalog through the held guard, with WAL
//! lines deferred to an in-memory buffer.
//!
//! - `commit` flushes the buffered WAL lines in order, persists the
//!   snapshot under the still-held guard, truncates the WAL, and releases
//!   the lock.
//! - `rollback` swaps the rollback image back in and releases the lock;
//!   nothing reaches the WAL file.
//! - Dropping an unfinished transaction rolls back.
//!
//! One transaction can exist at a time process-wide: a second `begin`
//! blocks until the first finishes, and calling `begin` twice on the same
//! thread deadlocks. That mirrors the documented single-transaction
//! contract.

use eyre::Result;
use parking_lot::RwLockWriteGuard;

use super::{CatalogAccess, Database, Session, WalSink};
use crate::schema::Catalog;

/// Exclusive transaction: held catalog lock, rollback image, deferred WAL.
pub struct Transaction<'db> {
    db: &'db Database,
    guard: Option<RwLockWriteGuard<'db, Catalog>>,
    rollback_image: Option<Catalog>,
    wal_buffer: Vec<String>,
}

impl Database {
    /// Starts a transaction, taking the catalog lock exclusively and
    /// cloning the catalog as the rollback image.
    ///
    /// Blocks while another transaction is active; nesting on one thread
    /// deadlocks.
    pub fn begin(&self) -> Transaction<'_> {
        let guard = self.shared.catalog.write();
        let rollback_image = guard.deep_clone();
        Transaction {
            db: self,
            guard: Some(guard),
            rollback_image: Some(rollback_image),
            wal_buffer: Vec::new(),
        }
    }
}

impl Transaction<'_> {
    /// Executes a statement inside the transaction.
    pub fn exec(&mut self, query: &str) -> Result<String> {
        let guard = self
            .guard
            .as_mut()
            .expect("transaction is still open while exec is reachable");
        let mut session = Session {
            catalog: CatalogAccess::Exclusive(&mut **guard),
            wal: WalSink::Buffer(&mut self.wal_buffer),
        };
        self.db.dispatch(&mut session, query)
    }

    /// Makes the transaction durable: buffered WAL lines are flushed in
    /// order, the snapshot is persisted under the held lock, and the WAL
    /// is truncated.
    pub fn commit(mut self) -> Result<()> {
        let guard = self
            .guard
            .take()
            .expect("transaction is still open while commit is reachable");
        self.rollback_image = None;

        self.db.shared.wal.append_all(&self.wal_buffer)?;
        self.db.shared.snapshot.save(&guard)?;
        self.db.shared.wal.clear()?;
        drop(guard);
        Ok(())
    }

    /// Discards all changes, restoring the begin-time catalog.
    pub fn rollback(mut self) {
        self.rollback_now();
    }

    fn rollback_now(&mut self) {
        if let Some(mut guard) = self.guard.take() {
            if let Some(image) = self.rollback_image.take() {
                *guard = image;
            }
            // SELECTs executed inside the transaction may have cached
            // responses computed from the discarded state.
            self.db.clear_cache();
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        self.rollback_now();
    }
}
