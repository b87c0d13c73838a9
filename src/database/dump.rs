//! # SQL Dump
//!
//! Exports every table as executable SQL: one `CREATE TABLE …;` followed by
//! one `INSERT INTO … VALUES (…);` per row. TEXT literals are single-quoted
//! with embedded quotes doubled; INT, FLOAT, and BOOL values are unquoted.
//! Tables emit in sorted name order.
//!
//! Relative dump filenames resolve against the database directory; absolute
//! paths are used as given.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

use super::{Database, Session};
use crate::schema::{Catalog, Table};
use crate::sql::parser;
use crate::types::Value;

impl Database {
    pub(crate) fn execute_dump(&self, session: &mut Session<'_>, query: &str) -> Result<String> {
        let stmt = parser::parse_dump(query);
        let path = self.resolve_dump_path(&stmt.filename);
        session
            .catalog
            .with_read(|catalog| write_dump(catalog, &path))?;
        Ok(format!("Dump saved to {}.", stmt.filename))
    }

    /// Exports all tables to `filename` as SQL statements.
    pub fn save_sql_dump(&self, filename: &str) -> Result<()> {
        let path = self.resolve_dump_path(filename);
        let catalog = self.shared.catalog.read();
        write_dump(&catalog, &path)
    }

    fn resolve_dump_path(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.shared.dir.join(path)
        }
    }
}

fn write_dump(catalog: &Catalog, path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create dump file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for name in catalog.sorted_names() {
        let table_ref = catalog.get(&name).expect("catalog names are current");
        let table = table_ref.read();
        writer.write_all(create_sql(&table).as_bytes())?;
        for row in table.rows() {
            writer.write_all(insert_sql(&table, row).as_bytes())?;
        }
    }

    writer
        .flush()
        .wrap_err_with(|| format!("failed to write dump file {}", path.display()))
}

fn create_sql(table: &Table) -> String {
    let mut sql = format!("CREATE TABLE {} (", table.name());
    for (i, column) in table.columns().iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let _ = write!(sql, "{} {}", column.name, column.ty);
    }
    sql.push_str(");\n");
    sql
}

fn insert_sql(table: &Table, row: &[Value]) -> String {
    let mut sql = format!("INSERT INTO {} VALUES (", table.name());
    for (i, value) in row.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        match value {
            Value::Text(text) => {
                let _ = write!(sql, "'{}'", text.replace('\'', "''"));
            }
            other => {
                let _ = write!(sql, "{}", other);
            }
        }
    }
    sql.push_str(");\n");
    sql
}
