//! # Type System
//!
//! Core value and column types shared by every layer: the parser type-checks
//! literals against [`ColumnType`], tables store [`Value`] cells, indexes key
//! on `Value`, and the snapshot codec persists the uppercase type tags.

mod column;
mod value;

pub use column::{Column, ColumnType};
pub use value::Value;
