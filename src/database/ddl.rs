//! # DDL Executors
//!
//! CREATE TABLE installs (or silently replaces) a table in the catalog and
//! persists the snapshot. CREATE INDEX builds a per-column hash index under
//! the table's write lock; it is neither WAL-logged nor persisted — after a
//! reload an index exists only once the statement is issued again.

use eyre::Result;

use super::{Database, Session};
use crate::schema::Table;
use crate::sql::parser;
use crate::types::{Column, ColumnType};

impl Database {
    pub(crate) fn execute_create_table(
        &self,
        session: &mut Session<'_>,
        query: &str,
    ) -> Result<String> {
        session.wal.log(query)?;
        let stmt = parser::parse_create_table(query)?;

        let mut columns = Vec::with_capacity(stmt.columns.len());
        for spec in &stmt.columns {
            let ty = match &spec.type_name {
                Some(tag) => ColumnType::parse(tag)?,
                None => ColumnType::Text,
            };
            columns.push(Column::new(spec.name.clone(), ty));
        }

        let table = Table::new(stmt.table.clone(), columns);
        let wal = &mut session.wal;
        session.catalog.with_write(|catalog| -> Result<()> {
            catalog.install(table);
            self.shared.snapshot.save(catalog)?;
            wal.truncate()
        })?;

        self.clear_cache();
        Ok(format!("Table '{}' created.", stmt.table))
    }

    pub(crate) fn execute_create_index(
        &self,
        session: &mut Session<'_>,
        query: &str,
    ) -> Result<String> {
        let stmt = parser::parse_create_index(query)?;

        session.catalog.with_read(|catalog| -> Result<()> {
            let table_ref = catalog.resolve(&stmt.table)?;
            let mut table = table_ref.write();
            let pos = table.column_position(&stmt.column).ok_or_else(|| {
                eyre::eyre!("unknown column '{}' in table '{}'", stmt.column, stmt.table)
            })?;
            table.build_index(pos);
            Ok(())
        })?;

        self.clear_cache();
        Ok(format!("Index created on {}({}).", stmt.table, stmt.column))
    }
}
