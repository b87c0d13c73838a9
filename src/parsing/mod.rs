//! # Typed Literal Parsing
//!
//! Converts a raw SQL literal (already stripped of its outer quotes by the
//! statement parser) into a [`Value`] of the column's declared type.
//!
//! ## Rules
//!
//! | Type | Accepted input |
//! |------|----------------|
//! | INT | decimal integer, optional leading `-` |
//! | FLOAT | decimal or scientific notation |
//! | BOOL | `true`/`1`/`false`/`0`, case-insensitive |
//! | TEXT | anything, taken literally |
//!
//! Negative-zero floats are canonicalized to `+0.0` so that `WHERE x = -0`
//! matches a stored `0` under the bit-exact equality used by index keys.
//!
//! ## Error Handling
//!
//! Failures return `eyre::Result` with the offending literal and type:
//!
//! ```text
//! invalid INT literal 'abc'
//! ```
//!
//! Executors wrap this with the column name for the full
//! `invalid value for column '...'` report.

use eyre::{bail, Result};

use crate::types::{ColumnType, Value};

/// Parses a literal against the declared column type.
pub fn parse_value(text: &str, ty: ColumnType) -> Result<Value> {
    match ty {
        ColumnType::Int => match text.parse::<i64>() {
            Ok(i) => Ok(Value::Int(i)),
            Err(_) => bail!("invalid INT literal '{}'", text),
        },
        ColumnType::Float => match text.parse::<f64>() {
            Ok(f) if f == 0.0 => Ok(Value::Float(0.0)),
            Ok(f) => Ok(Value::Float(f)),
            Err(_) => bail!("invalid FLOAT literal '{}'", text),
        },
        ColumnType::Bool => match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => bail!("invalid BOOL literal '{}'", text),
        },
        ColumnType::Text => Ok(Value::Text(text.to_string())),
    }
}
