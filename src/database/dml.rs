//! # DML Executors
//!
//! INSERT and UPDATE follow the shared mutation sequence: WAL append,
//! validate, apply under the table write lock, snapshot, WAL truncate,
//! cache clear. Literal type checks run against the table's declared column
//! types; the first failure aborts the statement (its WAL line stays and
//! reproduces the same failure on replay).

use eyre::{ensure, Result, WrapErr};
use smallvec::SmallVec;

use super::{Database, Session};
use crate::parsing::parse_value;
use crate::schema::Row;
use crate::sql::parser;
use crate::types::Value;

impl Database {
    pub(crate) fn execute_insert(&self, session: &mut Session<'_>, query: &str) -> Result<String> {
        session.wal.log(query)?;
        let stmt = parser::parse_insert(query)?;

        let wal = &mut session.wal;
        session.catalog.with_read(|catalog| -> Result<()> {
            let table_ref = catalog.resolve(&stmt.table)?;
            {
                let mut table = table_ref.write();
                ensure!(
                    stmt.values.len() == table.columns().len(),
                    "table '{}' has {} columns, got {} values",
                    stmt.table,
                    table.columns().len(),
                    stmt.values.len()
                );

                let mut row: Row = Vec::with_capacity(stmt.values.len());
                for (literal, column) in stmt.values.iter().zip(table.columns()) {
                    let value = parse_value(literal, column.ty).wrap_err_with(|| {
                        format!("invalid value for column '{}'", column.name)
                    })?;
                    row.push(value);
                }
                table.append_row(row);
            }
            self.shared.snapshot.save(catalog)?;
            wal.truncate()
        })?;

        self.clear_cache();
        Ok("1 row inserted.".to_string())
    }

    pub(crate) fn execute_update(&self, session: &mut Session<'_>, query: &str) -> Result<String> {
        session.wal.log(query)?;
        let stmt = parser::parse_update(query)?;

        let wal = &mut session.wal;
        let updated = session.catalog.with_read(|catalog| -> Result<usize> {
            let table_ref = catalog.resolve(&stmt.table)?;
            let updated;
            {
                let mut table = table_ref.write();

                let mut assignments: SmallVec<[(usize, Value); 4]> = SmallVec::new();
                for assignment in &stmt.assignments {
                    let pos = table.column_position(&assignment.column).ok_or_else(|| {
                        eyre::eyre!(
                            "unknown column '{}' in table '{}'",
                            assignment.column,
                            stmt.table
                        )
                    })?;
                    let value = parse_value(&assignment.literal, table.columns()[pos].ty)
                        .wrap_err_with(|| {
                            format!("invalid value for column '{}'", assignment.column)
                        })?;
                    assignments.push((pos, value));
                }

                let cond_pos = table.column_position(&stmt.predicate.column).ok_or_else(|| {
                    eyre::eyre!(
                        "unknown column '{}' in table '{}'",
                        stmt.predicate.column,
                        stmt.table
                    )
                })?;
                let cond = parse_value(&stmt.predicate.literal, table.columns()[cond_pos].ty)
                    .wrap_err_with(|| {
                        format!("invalid value for column '{}'", stmt.predicate.column)
                    })?;

                updated = table.update_where(cond_pos, &cond, &assignments);
            }
            self.shared.snapshot.save(catalog)?;
            wal.truncate()?;
            Ok(updated)
        })?;

        self.clear_cache();
        Ok(format!("{} rows updated.", updated))
    }
}
