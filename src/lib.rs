//! # MiniSQL - Embeddable Mini SQL Engine
//!
//! MiniSQL is a single-process, embeddable relational store speaking a
//! small SQL dialect. State lives in memory; durability comes from a binary
//! snapshot file plus a statement-level write-ahead log replayed on open.
//!
//! ## Quick Start
//!
//! ```ignore
//! use minisql::Database;
//!
//! let db = Database::open("./mydb")?;
//! db.execute("CREATE TABLE users (id INT, name TEXT)")?;
//! db.execute("INSERT INTO users VALUES (1, 'Alice')")?;
//! let text = db.execute("SELECT * FROM users")?;
//! assert_eq!(text, "id\tname\n1\tAlice\n");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Shells: REPL (cli) │ HTTP (server)      │
//! ├──────────────────────────────────────────┤
//! │  Database: dispatcher, executors, tx     │
//! ├──────────────┬──────────────┬────────────┤
//! │  sql parser  │ result cache │ catalog    │
//! ├──────────────┴──────────────┴────────────┤
//! │  storage: snapshot codec (v1–v3) + WAL   │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Durability Model
//!
//! Mutating statements append their raw text to `data.wal` before touching
//! memory; the full catalog is then rewritten to `data.mdb` and the WAL is
//! truncated. A crash between those steps is recovered by replaying the
//! WAL over the last complete snapshot.
//!
//! ## Supported Statements
//!
//! `CREATE TABLE`, `CREATE INDEX`, `INSERT`, `UPDATE … WHERE` (single
//! equality), `SELECT` with optional equality WHERE, and `DUMP`.
//!
//! ## Module Overview
//!
//! - [`types`]: value and column type system
//! - [`parsing`]: typed literal parsing
//! - [`schema`]: tables, hash indexes, catalog
//! - [`sql`]: statement classification and argument extraction
//! - [`cache`]: LRU result cache
//! - [`storage`]: snapshot codec, snapshot file, WAL
//! - [`database`]: the `Database` handle, executors, transactions
//! - [`server`], [`cli`]: HTTP and interactive shells

pub mod cache;
pub mod cli;
pub mod database;
pub mod parsing;
pub mod schema;
pub mod server;
pub mod sql;
pub mod storage;
pub mod types;

pub use database::{Database, DatabaseBuilder, Transaction, DEFAULT_MAX_ROW_COUNT};
pub use types::{Column, ColumnType, Value};
