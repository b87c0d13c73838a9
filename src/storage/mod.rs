//! # Persistence Layer
//!
//! Two files in the database directory carry all durable state:
//!
//! - `data.mdb` — the binary catalog snapshot ([`snapshot`], [`codec`])
//! - `data.wal` — the append-only statement log ([`wal`])
//!
//! Durability ordering: a mutating statement is durable once its WAL line
//! is synced; the snapshot rewrite afterwards is an optimization of
//! recovery time. Crash recovery loads the snapshot and replays the WAL.

pub mod codec;
pub mod snapshot;
pub mod wal;

pub use snapshot::Snapshot;
pub use wal::Wal;

/// Snapshot file name inside the database directory.
pub const SNAPSHOT_FILE: &str = "data.mdb";
/// WAL file name inside the database directory.
pub const WAL_FILE: &str = "data.wal";
