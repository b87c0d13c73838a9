//! # Catalog
//!
//! The catalog maps table names to tables. The `Database` handle owns a
//! single catalog behind a process-wide `RwLock`; transactions clone the
//! whole catalog as their rollback image and the loader replaces it
//! atomically after decoding a snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::Result;
use parking_lot::RwLock;

use super::table::Table;

/// Shared handle to a single table and its lock.
pub type TableRef = Arc<RwLock<Table>>;

/// Process-wide mapping of table name → table.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableRef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a table handle by name.
    pub fn get(&self, name: &str) -> Option<TableRef> {
        self.tables.get(name).cloned()
    }

    /// Resolves a table or fails with the canonical not-found report.
    pub fn resolve(&self, name: &str) -> Result<TableRef> {
        self.get(name)
            .ok_or_else(|| eyre::eyre!("table '{}' not found", name))
    }

    /// Installs a table, replacing any existing entry of the same name.
    pub fn install(&mut self, table: Table) {
        self.tables
            .insert(table.name().to_string(), Arc::new(RwLock::new(table)));
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names in sorted order, for deterministic snapshots and dumps.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Full copy of every table, row, and index bucket.
    ///
    /// Transactions hold this as their rollback image.
    pub fn deep_clone(&self) -> Catalog {
        let tables = self
            .tables
            .iter()
            .map(|(name, table)| {
                (
                    name.clone(),
                    Arc::new(RwLock::new(table.read().deep_clone())),
                )
            })
            .collect();
        Catalog { tables }
    }
}
