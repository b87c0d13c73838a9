//! # Startup Recovery
//!
//! Opening a database runs two phases:
//!
//! 1. **Snapshot load.** `data.mdb` is decoded and installed as the live
//!    catalog under the catalog write lock. If the file carries an older
//!    format version it is rewritten in the current version immediately.
//! 2. **WAL replay.** Every statement line in `data.wal` is re-executed
//!    through the normal dispatcher with WAL appends suppressed, then the
//!    log is removed. A replay failure aborts initialization — the same
//!    statement failed the same way before the crash, and surfacing it
//!    beats silently dropping the tail of the log.

use eyre::{Result, WrapErr};

use super::{CatalogAccess, Database, Session, WalSink};
use crate::storage::codec::CURRENT_VERSION;

impl Database {
    pub(crate) fn init(&self) -> Result<()> {
        if let Some((catalog, version)) = self.shared.snapshot.load()? {
            let mut live = self.shared.catalog.write();
            *live = catalog;
            if version < CURRENT_VERSION {
                self.shared.snapshot.save(&live)?;
                tracing::info!(
                    from = version,
                    to = CURRENT_VERSION,
                    "upgraded snapshot format in place"
                );
            }
        }
        self.replay_wal()
    }

    fn replay_wal(&self) -> Result<()> {
        let statements = self.shared.wal.read_statements()?;
        for statement in &statements {
            let mut session = Session {
                catalog: CatalogAccess::Locked(&self.shared.catalog),
                wal: WalSink::Replay,
            };
            self.dispatch(&mut session, statement)
                .wrap_err_with(|| format!("WAL replay failed for statement '{}'", statement))?;
        }
        if !statements.is_empty() {
            tracing::info!(statements = statements.len(), "replayed write-ahead log");
        }
        self.shared.wal.clear()
    }
}
