//! # HTTP Query Endpoint
//!
//! Minimal HTTP/1.1 listener exposing the dispatcher at `POST /query`: the
//! request body is the raw statement, the response body is the dispatcher's
//! text (200) or the error text (400). Anything but `/query` is 404, any
//! other method 405.
//!
//! Built directly on `std::net::TcpListener` with a thread per connection;
//! the `Database` handle is cheap to clone and fully thread-safe, so each
//! connection executes against the shared engine.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use eyre::{Result, WrapErr};

use crate::Database;

struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

/// Binds `addr` and serves queries until the process exits.
pub fn serve(addr: &str, db: Database) -> Result<()> {
    let listener =
        TcpListener::bind(addr).wrap_err_with(|| format!("failed to bind {}", addr))?;
    tracing::info!(addr, "listening for queries");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let db = db.clone();
                thread::spawn(move || {
                    if let Err(e) = handle_connection(stream, &db) {
                        tracing::debug!(error = %e, "connection error");
                    }
                });
            }
            Err(e) => tracing::warn!(error = %e, "accept failed"),
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream, db: &Database) -> io::Result<()> {
    let request = parse_request(&mut stream)?;

    if request.path != "/query" {
        return send_response(&mut stream, 404, b"not found\n");
    }
    if request.method != "POST" {
        return send_response(&mut stream, 405, b"method not allowed\n");
    }

    let query = String::from_utf8_lossy(&request.body);
    match db.execute(&query) {
        Ok(text) => send_response(&mut stream, 200, text.as_bytes()),
        Err(e) => send_response(&mut stream, 400, format!("{}\n", e).as_bytes()),
    }
}

fn parse_request(stream: &mut TcpStream) -> io::Result<Request> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();

    reader.read_line(&mut line)?;
    let parts: Vec<&str> = line.trim().split_whitespace().collect();
    if parts.len() < 3 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "invalid request line",
        ));
    }
    let method = parts[0].to_string();
    let path = parts[1].to_string();

    let mut headers = HashMap::new();
    loop {
        line.clear();
        reader.read_line(&mut line)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            headers.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let mut body = Vec::new();
    if let Some(len) = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
    {
        if len > 0 {
            body.resize(len, 0);
            reader.read_exact(&mut body)?;
        }
    }

    Ok(Request { method, path, body })
}

fn send_response(stream: &mut TcpStream, status: u16, body: &[u8]) -> io::Result<()> {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        status,
        status_text,
        body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()
}
