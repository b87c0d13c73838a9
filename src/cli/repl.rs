//! # REPL - Interactive Shell
//!
//! Reads lines with rustyline, accumulating a statement buffer until a
//! line ends with `;`. The trailing semicolon is stripped before dispatch;
//! a buffer equal to `exit` terminates the loop. Errors print as
//! `Error: <message>` and do not end the session.
//!
//! The prompt switches from `minisql>` to `      ->` while a statement is
//! still accumulating.

use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::Database;

const PRIMARY_PROMPT: &str = "minisql> ";
const CONTINUATION_PROMPT: &str = "      -> ";

pub struct Repl {
    db: Database,
    editor: DefaultEditor,
    buffer: String,
}

impl Repl {
    pub fn new(db: Database) -> Result<Self> {
        let editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;
        Ok(Self {
            db,
            editor,
            buffer: String::new(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        println!("Welcome to MiniSQL");
        println!("Type SQL statements (end with semicolon ';'). Type 'exit;' to quit");

        loop {
            let prompt = if self.buffer.is_empty() {
                PRIMARY_PROMPT
            } else {
                CONTINUATION_PROMPT
            };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    self.buffer.clear();
                    println!("^C");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }
        Ok(())
    }

    /// Returns false when the session should end.
    fn handle_line(&mut self, line: &str) -> bool {
        self.buffer.push(' ');
        self.buffer.push_str(line);

        if !line.trim_end().ends_with(';') {
            return true;
        }

        let trimmed = self.buffer.trim();
        let statement = trimmed
            .strip_suffix(';')
            .unwrap_or(trimmed)
            .trim()
            .to_string();
        self.buffer.clear();

        if statement == "exit" {
            return false;
        }
        if statement.is_empty() {
            return true;
        }

        let _ = self.editor.add_history_entry(&statement);
        match self.db.execute(&statement) {
            Ok(response) => println!("{}", response),
            Err(err) => println!("Error: {}", err),
        }
        true
    }
}
