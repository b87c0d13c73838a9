//! # Schema Objects
//!
//! In-memory schema layer: [`Table`] (columns, rows, per-column indexes) and
//! the process-wide [`Catalog`] of tables. Locking lives at this layer —
//! each table sits behind its own `RwLock`, nested inside the catalog lock
//! owned by the `Database` handle.

mod catalog;
mod table;

pub use catalog::{Catalog, TableRef};
pub use table::{Index, Row, Table};
