//! # Write-Ahead Log
//!
//! Append-only UTF-8 text log (`data.wal`), one mutating statement per
//! line. A statement is durable once its line is synced; the snapshot
//! rewrite that follows each mutation only shortens recovery, it is not the
//! durability point.
//!
//! ## Protocol
//!
//! - Mutating executors append the raw statement *before* touching memory.
//! - After a successful snapshot save (outside a transaction) the file is
//!   removed.
//! - Recovery re-executes each non-blank line through the dispatcher with
//!   appends suppressed, then removes the file.
//!
//! A `Mutex` serializes append/clear/read; it nests innermost in the
//! catalog → table → WAL lock order.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use parking_lot::Mutex;

/// Handle to the WAL file.
#[derive(Debug)]
pub struct Wal {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Wal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one statement line and syncs it to disk.
    pub fn append(&self, statement: &str) -> Result<()> {
        self.write_lines(&[statement])
    }

    /// Appends a batch of statement lines in order, then syncs once.
    ///
    /// Transaction commit uses this to flush its deferred buffer.
    pub fn append_all(&self, statements: &[String]) -> Result<()> {
        let lines: Vec<&str> = statements.iter().map(String::as_str).collect();
        self.write_lines(&lines)
    }

    fn write_lines(&self, lines: &[&str]) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .wrap_err_with(|| format!("failed to open WAL {}", self.path.display()))?;
        for line in lines {
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
        }
        file.sync_data()
            .wrap_err_with(|| format!("failed to sync WAL {}", self.path.display()))?;
        Ok(())
    }

    /// Removes the log file; a missing file is fine.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).wrap_err_with(|| format!("failed to remove WAL {}", self.path.display()))
            }
        }
    }

    /// Reads every non-blank statement line; a missing file yields none.
    pub fn read_statements(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock();
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .wrap_err_with(|| format!("failed to read WAL {}", self.path.display()))
            }
        };
        Ok(data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
