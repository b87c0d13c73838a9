//! # Runtime Value Representation
//!
//! This module provides `Value`, the runtime representation for MiniSQL
//! cells. Values are fully owned: rows live in memory for the lifetime of
//! their table, and index keys must own their payload.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Rendered as |
//! |---------|-----------|-------------|
//! | Int | i64 | decimal |
//! | Float | f64 | shortest round-trip decimal |
//! | Bool | bool | `true` / `false` |
//! | Text | String | the text, unquoted |
//!
//! ## Equality Semantics
//!
//! Equality is variant + payload; cross-variant comparisons are never equal.
//! Floats compare by bit pattern so that `Value` can serve as a hash-map key
//! without violating the `Eq`/`Hash` contract. Negative zero is canonicalized
//! to positive zero when literals are parsed (see [`crate::parsing`]), which
//! keeps bit equality observably identical to IEEE `==` for every value the
//! engine can store, except that a stored NaN equals itself.
//!
//! ## Hashing
//!
//! The hash covers the discriminant and the payload, with `f64::to_bits` for
//! floats. Index buckets key on `Value` directly.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::ColumnType;

/// A single table cell.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// The column type this value conforms to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Int(_) => ColumnType::Int,
            Value::Float(_) => ColumnType::Float,
            Value::Bool(_) => ColumnType::Bool,
            Value::Text(_) => ColumnType::Text,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        match self {
            Value::Int(i) => {
                0u8.hash(hasher);
                i.hash(hasher);
            }
            Value::Float(f) => {
                1u8.hash(hasher);
                f.to_bits().hash(hasher);
            }
            Value::Bool(b) => {
                2u8.hash(hasher);
                b.hash(hasher);
            }
            Value::Text(s) => {
                3u8.hash(hasher);
                s.hash(hasher);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
        }
    }
}
