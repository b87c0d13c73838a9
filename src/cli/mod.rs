//! # Command-Line Interface
//!
//! The interactive shell over a [`crate::Database`]. Everything here is a
//! thin layer: statements go to `Database::execute` and the response text
//! (or `Error: …`) is printed back.

mod repl;

pub use repl::Repl;
