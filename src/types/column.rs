//! # Column Types and Definitions
//!
//! This module provides the `ColumnType` enumeration and the `Column`
//! definition pairing a name with its type.
//!
//! ## Type System
//!
//! | Type | Rust payload | Literal form |
//! |------|--------------|--------------|
//! | INT | i64 | decimal, optional leading `-` |
//! | TEXT | String | single-quoted or bare |
//! | FLOAT | f64 | decimal or scientific |
//! | BOOL | bool | `true`/`1`/`false`/`0` |
//!
//! Type names are case-insensitive on input and canonicalized uppercase on
//! output (the snapshot codec and the SQL dump both persist the uppercase
//! tag). Column names are case-sensitive.

use eyre::{bail, Result};
use std::fmt;

/// Data type of a table column.
///
/// Uses `#[repr(u8)]` for a single-byte discriminant, matching the cell tag
/// granularity of the on-disk format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int = 0,
    Text = 1,
    Float = 2,
    Bool = 3,
}

impl ColumnType {
    /// Parses a type tag, case-insensitively.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INT" => Ok(ColumnType::Int),
            "TEXT" => Ok(ColumnType::Text),
            "FLOAT" => Ok(ColumnType::Float),
            "BOOL" => Ok(ColumnType::Bool),
            other => bail!("unknown type '{}'", other),
        }
    }

    /// Canonical uppercase tag, as persisted in snapshots and dumps.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::Text => "TEXT",
            ColumnType::Float => "FLOAT",
            ColumnType::Bool => "BOOL",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column definition: a case-sensitive name plus its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
