//! # Binary Snapshot Codec
//!
//! Reader and writer for the versioned table-record format of the snapshot
//! file. The file is `MAGIC | version:u8 | table*`; running out of input on
//! a table-record boundary is a clean end of file, running out inside a
//! record is corruption.
//!
//! ## Version Table
//!
//! All integers are little-endian.
//!
//! | Field | v1 | v2 | v3 |
//! |-------|----|----|----|
//! | table name length | u8 | u8 | u16 |
//! | column count | u8 | u8 | u16 |
//! | column name length | u8 | u8 | u16 |
//! | column type | absent (all TEXT) | `len:u8 + tag` | `len:u8 + tag` |
//! | row count | u32 | u32 | u64 |
//! | cell length | u16 | u16 | u32 |
//!
//! Cells are stored as the rendered string form of the value. v1 predates
//! column types, so every decoded cell is TEXT; v2 and v3 parse each cell
//! against its column's declared type on load.
//!
//! ## Writing
//!
//! Saves always emit the current version (3). The v3 widths bound a table
//! at 65,535 columns and a cell at 4 GiB; exceeding either is an encode
//! error rather than silent truncation.

use std::io::Write;

use eyre::{bail, ensure, Result, WrapErr};
use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::parsing::parse_value;
use crate::schema::{Row, Table};
use crate::types::{Column, ColumnType, Value};

pub const MAGIC: [u8; 4] = *b"MYDB";
pub const CURRENT_VERSION: u8 = 3;
pub const FILE_HEADER_SIZE: usize = 5;

/// Five-byte file header: magic tag plus format version.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable)]
pub struct FileHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl FileHeader {
    pub fn current() -> Self {
        Self {
            magic: MAGIC,
            version: CURRENT_VERSION,
        }
    }
}

/// Cursor over an in-memory snapshot image.
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        ensure!(self.buf.len() >= n, "unexpected end of snapshot data");
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn read_str(&mut self, len: usize) -> Result<&'a str> {
        std::str::from_utf8(self.take(len)?).wrap_err("snapshot string is not valid UTF-8")
    }
}

/// Decodes one table record in the given format version.
pub fn decode_table(r: &mut Reader<'_>, version: u8, max_row_count: u64) -> Result<Table> {
    let name_len = match version {
        1 | 2 => r.read_u8()? as usize,
        _ => r.read_u16()? as usize,
    };
    let name = r.read_str(name_len)?.to_string();

    let column_count = match version {
        1 | 2 => r.read_u8()? as usize,
        _ => r.read_u16()? as usize,
    };

    let mut columns = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        let col_name_len = match version {
            1 | 2 => r.read_u8()? as usize,
            _ => r.read_u16()? as usize,
        };
        let col_name = r.read_str(col_name_len)?.to_string();

        let ty = if version == 1 {
            ColumnType::Text
        } else {
            let tag_len = r.read_u8()? as usize;
            let tag = r.read_str(tag_len)?;
            ColumnType::parse(tag)
                .wrap_err_with(|| format!("column '{}' of table '{}'", col_name, name))?
        };
        columns.push(Column::new(col_name, ty));
    }

    let row_count = match version {
        1 | 2 => r.read_u32()? as u64,
        _ => r.read_u64()?,
    };
    if row_count > max_row_count {
        bail!(
            "table '{}': row count {} exceeds maximum {}",
            name,
            row_count,
            max_row_count
        );
    }

    let mut table = Table::new(name, columns);
    for _ in 0..row_count {
        let mut row: Row = Vec::with_capacity(column_count);
        for col in 0..column_count {
            let cell_len = match version {
                1 | 2 => r.read_u16()? as usize,
                _ => r.read_u32()? as usize,
            };
            let cell = r.read_str(cell_len)?;
            let column = &table.columns()[col];
            let value = if version == 1 {
                Value::Text(cell.to_string())
            } else {
                parse_value(cell, column.ty).wrap_err_with(|| {
                    format!(
                        "invalid value for column '{}' of table '{}'",
                        column.name,
                        table.name()
                    )
                })?
            };
            row.push(value);
        }
        table.append_row(row);
    }

    Ok(table)
}

/// Encodes one table record in the current format version.
pub fn encode_table(w: &mut impl Write, table: &Table) -> Result<()> {
    let name = table.name().as_bytes();
    ensure!(
        name.len() <= u16::MAX as usize,
        "table name '{}' exceeds the format limit",
        table.name()
    );
    w.write_all(&(name.len() as u16).to_le_bytes())?;
    w.write_all(name)?;

    ensure!(
        table.columns().len() <= u16::MAX as usize,
        "table '{}' has too many columns for the format",
        table.name()
    );
    w.write_all(&(table.columns().len() as u16).to_le_bytes())?;

    for column in table.columns() {
        let col_name = column.name.as_bytes();
        ensure!(
            col_name.len() <= u16::MAX as usize,
            "column name '{}' exceeds the format limit",
            column.name
        );
        w.write_all(&(col_name.len() as u16).to_le_bytes())?;
        w.write_all(col_name)?;

        let tag = column.ty.as_str().as_bytes();
        w.write_all(&[tag.len() as u8])?;
        w.write_all(tag)?;
    }

    w.write_all(&(table.rows().len() as u64).to_le_bytes())?;

    for row in table.rows() {
        for value in row {
            let cell = value.to_string();
            ensure!(
                cell.len() <= u32::MAX as usize,
                "cell in table '{}' exceeds the format limit",
                table.name()
            );
            w.write_all(&(cell.len() as u32).to_le_bytes())?;
            w.write_all(cell.as_bytes())?;
        }
    }

    Ok(())
}
