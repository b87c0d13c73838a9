//! # MiniSQL CLI Entry Point
//!
//! Runs the interactive shell by default, or the HTTP query endpoint when
//! `-listen` is given.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive shell against ./data.mdb / ./data.wal
//! minisql
//!
//! # Shell against another directory
//! minisql --data ./mydb
//!
//! # HTTP endpoint
//! minisql --listen 127.0.0.1:7878
//!
//! # Enable the SELECT result cache (bytes)
//! minisql --cache 1048576
//! ```

use std::env;
use std::path::PathBuf;

use eyre::{bail, Result, WrapErr};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use minisql::cli::Repl;
use minisql::{server, Database};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut listen: Option<String> = None;
    let mut data_dir = PathBuf::from(".");
    let mut cache_bytes: usize = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("minisql {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--listen" | "-listen" | "-l" => {
                i += 1;
                match args.get(i) {
                    Some(addr) => listen = Some(addr.clone()),
                    None => bail!("--listen requires an address"),
                }
            }
            "--data" | "-d" => {
                i += 1;
                match args.get(i) {
                    Some(dir) => data_dir = PathBuf::from(dir),
                    None => bail!("--data requires a directory"),
                }
            }
            "--cache" => {
                i += 1;
                match args.get(i) {
                    Some(bytes) => {
                        cache_bytes = bytes
                            .parse()
                            .wrap_err_with(|| format!("invalid cache size '{}'", bytes))?
                    }
                    None => bail!("--cache requires a byte count"),
                }
            }
            arg => bail!("unknown option: {}", arg),
        }
        i += 1;
    }

    let db = Database::builder()
        .path(&data_dir)
        .result_cache_bytes(cache_bytes)
        .open()
        .wrap_err_with(|| format!("failed to open database in {}", data_dir.display()))?;

    match listen {
        Some(addr) => server::serve(&addr, db),
        None => Repl::new(db)?.run(),
    }
}

fn print_usage() {
    println!("minisql - embeddable mini SQL engine");
    println!();
    println!("USAGE:");
    println!("  minisql [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -l, --listen <addr>   serve POST /query on this address instead of the shell");
    println!("  -d, --data <dir>      database directory (default: current directory)");
    println!("      --cache <bytes>   SELECT result cache budget (default: disabled)");
    println!("  -h, --help            show this help");
    println!("  -v, --version         show version");
}
