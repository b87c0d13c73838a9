//! # SELECT Executor
//!
//! Consults the result cache first (keyed by the trimmed raw query text),
//! otherwise scans under the catalog and table read locks and caches the
//! rendered response.
//!
//! ## Index Fast Path
//!
//! With a WHERE predicate on an indexed column, candidate positions come
//! from the index bucket instead of a full scan. Each candidate is still
//! re-checked against the predicate and bounds-checked against the row
//! vector, so a stale index can cost correctness nothing worse than a
//! skipped candidate.
//!
//! ## Response Format
//!
//! Header line of column names, then one line per row, fields joined by
//! TAB, every line newline-terminated.

use eyre::{Result, WrapErr};
use smallvec::SmallVec;

use super::{Database, Session};
use crate::parsing::parse_value;
use crate::schema::Row;
use crate::sql::ast::Projection;
use crate::sql::parser;

impl Database {
    pub(crate) fn execute_select(&self, session: &mut Session<'_>, query: &str) -> Result<String> {
        if let Some(hit) = self.shared.cache.lock().get(query) {
            return Ok(hit.to_string());
        }

        let stmt = parser::parse_select(query)?;

        let text = session.catalog.with_read(|catalog| -> Result<String> {
            let table_ref = catalog.resolve(&stmt.table)?;
            let table = table_ref.read();

            let positions: SmallVec<[usize; 8]> = match &stmt.projection {
                Projection::All => (0..table.columns().len()).collect(),
                Projection::Columns(names) => names
                    .iter()
                    .map(|name| {
                        table.column_position(name).ok_or_else(|| {
                            eyre::eyre!("unknown column '{}' in table '{}'", name, stmt.table)
                        })
                    })
                    .collect::<Result<_>>()?,
            };

            let predicate = match &stmt.predicate {
                Some(p) => {
                    let pos = table.column_position(&p.column).ok_or_else(|| {
                        eyre::eyre!("unknown column '{}' in table '{}'", p.column, stmt.table)
                    })?;
                    let value = parse_value(&p.literal, table.columns()[pos].ty)
                        .wrap_err_with(|| format!("invalid value for column '{}'", p.column))?;
                    Some((pos, value))
                }
                None => None,
            };

            let mut out = String::new();
            for (i, &pos) in positions.iter().enumerate() {
                if i > 0 {
                    out.push('\t');
                }
                out.push_str(&table.columns()[pos].name);
            }
            out.push('\n');

            match &predicate {
                None => {
                    for row in table.rows() {
                        render_row(&mut out, row, &positions);
                    }
                }
                Some((pos, value)) => {
                    let indexed = table
                        .index(&table.columns()[*pos].name)
                        .map(|index| index.positions(value).unwrap_or(&[]).to_vec());
                    match indexed {
                        Some(row_positions) => {
                            for row_pos in row_positions {
                                // Re-check: defends against stale index positions.
                                let Some(row) = table.rows().get(row_pos) else {
                                    continue;
                                };
                                if &row[*pos] == value {
                                    render_row(&mut out, row, &positions);
                                }
                            }
                        }
                        None => {
                            for row in table.rows() {
                                if &row[*pos] == value {
                                    render_row(&mut out, row, &positions);
                                }
                            }
                        }
                    }
                }
            }

            Ok(out)
        })?;

        self.shared.cache.lock().insert(query, text.clone());
        Ok(text)
    }
}

fn render_row(out: &mut String, row: &Row, positions: &[usize]) {
    for (i, &pos) in positions.iter().enumerate() {
        if i > 0 {
            out.push('\t');
        }
        out.push_str(&row[pos].to_string());
    }
    out.push('\n');
}
