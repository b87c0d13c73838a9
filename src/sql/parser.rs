//! # Statement Parser
//!
//! Deliberately lightweight statement recognition and argument extraction.
//! Statements are classified by the uppercase-ASCII prefix of the trimmed
//! input; arguments are then cut out by keyword position on an
//! ASCII-uppercased copy, so keywords match case-insensitively while
//! identifiers and literals keep their original case. ASCII uppercasing
//! preserves byte offsets, which keeps the keyword positions valid in the
//! original text.
//!
//! ## Recognized forms
//!
//! ```text
//! CREATE TABLE <name> ( <col> [<TYPE>], ... )
//! CREATE INDEX ... ON <table> ( <col> )
//! INSERT INTO <table> VALUES ( <lit>, ... )
//! UPDATE <table> SET <col>=<lit>[, ...] WHERE <col>=<lit>
//! SELECT <cols|*> FROM <table> [WHERE <col>=<lit>]
//! DUMP [<filename>]
//! ```
//!
//! ## Known limitation
//!
//! Literal lists split on commas without honoring quotes, so a text literal
//! containing a comma is split apart. Quote stripping removes exactly the
//! outermost pair of single quotes.

use eyre::{bail, Result};

use super::ast::{
    Assignment, ColumnSpec, CreateIndexStmt, CreateTableStmt, DumpStmt, InsertStmt, Projection,
    SelectStmt, StatementKind, UpdateStmt,
};

/// Classifies a trimmed statement by its uppercase prefix.
pub fn classify(query: &str) -> Option<StatementKind> {
    let upper = query.to_ascii_uppercase();
    if upper.starts_with("CREATE TABLE") {
        Some(StatementKind::CreateTable)
    } else if upper.starts_with("CREATE INDEX") {
        Some(StatementKind::CreateIndex)
    } else if upper.starts_with("INSERT INTO") {
        Some(StatementKind::Insert)
    } else if upper.starts_with("UPDATE") {
        Some(StatementKind::Update)
    } else if upper.starts_with("SELECT") {
        Some(StatementKind::Select)
    } else if upper.starts_with("DUMP") {
        Some(StatementKind::Dump)
    } else {
        None
    }
}

/// Removes the outermost single-quote pair, if present.
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

pub fn parse_create_table(query: &str) -> Result<CreateTableStmt> {
    let open = query.find('(');
    let close = query.find(')');
    let (open, close) = match (open, close) {
        (Some(o), Some(c)) if o < c => (o, c),
        _ => bail!("invalid syntax for CREATE TABLE"),
    };

    let table = query["CREATE TABLE".len()..open].trim().to_string();

    let mut columns = Vec::new();
    for spec in query[open + 1..close].split(',') {
        let mut parts = spec.split_whitespace();
        let Some(name) = parts.next() else {
            continue;
        };
        columns.push(ColumnSpec {
            name: name.to_string(),
            type_name: parts.next().map(str::to_string),
        });
    }

    Ok(CreateTableStmt { table, columns })
}

pub fn parse_create_index(query: &str) -> Result<CreateIndexStmt> {
    let upper = query.to_ascii_uppercase();
    let Some(on) = upper.find(" ON ") else {
        bail!("invalid syntax for CREATE INDEX");
    };

    let rest = &query[on + 4..];
    let (open, close) = match (rest.find('('), rest.find(')')) {
        (Some(o), Some(c)) if o < c => (o, c),
        _ => bail!("invalid syntax for CREATE INDEX"),
    };

    Ok(CreateIndexStmt {
        table: rest[..open].trim().to_string(),
        column: rest[open + 1..close].trim().to_string(),
    })
}

pub fn parse_insert(query: &str) -> Result<InsertStmt> {
    let upper = query.to_ascii_uppercase();
    let Some(values_idx) = upper.find("VALUES") else {
        bail!("invalid syntax for INSERT");
    };

    let head: Vec<&str> = query[..values_idx].split_whitespace().collect();
    if head.len() < 3 {
        bail!("invalid INSERT INTO syntax");
    }
    let table = head[2].to_string();

    let tail = &query[values_idx + "VALUES".len()..];
    let (open, close) = match (tail.find('('), tail.find(')')) {
        (Some(o), Some(c)) if o < c => (o, c),
        _ => bail!("invalid VALUES syntax"),
    };

    let values = tail[open + 1..close]
        .split(',')
        .map(|lit| strip_quotes(lit.trim()).to_string())
        .collect();

    Ok(InsertStmt { table, values })
}

fn parse_equality(raw: &str, fail: &'static str) -> Result<Assignment> {
    let Some((column, literal)) = raw.split_once('=') else {
        bail!("{}", fail);
    };
    Ok(Assignment {
        column: column.trim().to_string(),
        literal: strip_quotes(literal.trim()).to_string(),
    })
}

pub fn parse_update(query: &str) -> Result<UpdateStmt> {
    let upper = query.to_ascii_uppercase();
    let Some(set_idx) = upper.find(" SET ") else {
        bail!("invalid syntax for UPDATE");
    };
    let Some(where_idx) = upper.find(" WHERE ") else {
        bail!("UPDATE without WHERE is not supported");
    };
    if where_idx < set_idx + " SET ".len() {
        bail!("invalid syntax for UPDATE");
    }

    let table = query["UPDATE".len()..set_idx].trim().to_string();

    let assignments = query[set_idx + " SET ".len()..where_idx]
        .split(',')
        .map(|raw| parse_equality(raw, "invalid SET syntax"))
        .collect::<Result<Vec<_>>>()?;

    let predicate = parse_equality(&query[where_idx + " WHERE ".len()..], "invalid WHERE syntax")?;

    Ok(UpdateStmt {
        table,
        assignments,
        predicate,
    })
}

pub fn parse_select(query: &str) -> Result<SelectStmt> {
    let upper = query.to_ascii_uppercase();
    let Some(from_idx) = upper.find(" FROM ") else {
        bail!("invalid syntax for SELECT");
    };

    let raw_projection = query["SELECT".len()..from_idx].trim();
    if raw_projection.is_empty() {
        bail!("invalid syntax for SELECT");
    }
    let projection = if raw_projection == "*" {
        Projection::All
    } else {
        Projection::Columns(
            raw_projection
                .split(',')
                .map(|c| c.trim().to_string())
                .collect(),
        )
    };

    let rest = &query[from_idx + " FROM ".len()..];
    let rest_upper = &upper[from_idx + " FROM ".len()..];

    let (table_part, predicate) = match rest_upper.find(" WHERE ") {
        Some(w) => (
            &rest[..w],
            Some(parse_equality(
                &rest[w + " WHERE ".len()..],
                "invalid WHERE syntax",
            )?),
        ),
        None => (rest, None),
    };

    let Some(table) = table_part.split_whitespace().next() else {
        bail!("invalid syntax for SELECT");
    };

    Ok(SelectStmt {
        table: table.to_string(),
        projection,
        predicate,
    })
}

pub fn parse_dump(query: &str) -> DumpStmt {
    let filename = query
        .split_whitespace()
        .nth(1)
        .unwrap_or("dump.sql")
        .to_string();
    DumpStmt { filename }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(
            classify("create table t (a INT)"),
            Some(StatementKind::CreateTable)
        );
        assert_eq!(classify("select * from t"), Some(StatementKind::Select));
        assert_eq!(classify("DROP TABLE t"), None);
    }

    #[test]
    fn create_table_specs_default_to_text() {
        let stmt = parse_create_table("CREATE TABLE users (id INT, name TEXT, note)").unwrap();
        assert_eq!(stmt.table, "users");
        assert_eq!(stmt.columns.len(), 3);
        assert_eq!(stmt.columns[0].type_name.as_deref(), Some("INT"));
        assert_eq!(stmt.columns[2].name, "note");
        assert_eq!(stmt.columns[2].type_name, None);
    }

    #[test]
    fn create_table_requires_parentheses() {
        let err = parse_create_table("CREATE TABLE users").unwrap_err();
        assert!(err.to_string().contains("invalid syntax for CREATE TABLE"));
        assert!(parse_create_table("CREATE TABLE users ) id (").is_err());
    }

    #[test]
    fn create_index_reads_table_and_column() {
        let stmt = parse_create_index("CREATE INDEX idx_name ON users (name)").unwrap();
        assert_eq!(stmt.table, "users");
        assert_eq!(stmt.column, "name");
    }

    #[test]
    fn insert_strips_outer_quotes_only() {
        let stmt = parse_insert("INSERT INTO users VALUES (1, 'Alice')").unwrap();
        assert_eq!(stmt.table, "users");
        assert_eq!(stmt.values, vec!["1".to_string(), "Alice".to_string()]);

        let nested = parse_insert("INSERT INTO t VALUES (''quoted'')").unwrap();
        assert_eq!(nested.values, vec!["'quoted'".to_string()]);
    }

    #[test]
    fn insert_comma_split_ignores_quotes() {
        // Documented limitation: a comma inside a text literal splits it.
        let stmt = parse_insert("INSERT INTO t VALUES ('a,b')").unwrap();
        assert_eq!(stmt.values, vec!["'a".to_string(), "b'".to_string()]);
    }

    #[test]
    fn insert_requires_values_and_table() {
        assert!(parse_insert("INSERT INTO users (1)").is_err());
        assert!(parse_insert("INSERT INTO VALUES (1)").is_err());
        assert!(parse_insert("INSERT INTO users VALUES 1)").is_err());
    }

    #[test]
    fn update_extracts_assignments_and_predicate() {
        let stmt = parse_update("UPDATE users SET name='Bob', age=31 WHERE id=1").unwrap();
        assert_eq!(stmt.table, "users");
        assert_eq!(stmt.assignments.len(), 2);
        assert_eq!(stmt.assignments[0].column, "name");
        assert_eq!(stmt.assignments[0].literal, "Bob");
        assert_eq!(stmt.assignments[1].literal, "31");
        assert_eq!(stmt.predicate.column, "id");
        assert_eq!(stmt.predicate.literal, "1");
    }

    #[test]
    fn update_without_where_is_rejected() {
        let err = parse_update("UPDATE users SET name='Bob'").unwrap_err();
        assert!(err
            .to_string()
            .contains("UPDATE without WHERE is not supported"));
    }

    #[test]
    fn update_rejects_uneven_assignments() {
        let err = parse_update("UPDATE users SET name WHERE id=1").unwrap_err();
        assert!(err.to_string().contains("invalid SET syntax"));
    }

    #[test]
    fn select_star_and_column_lists() {
        let all = parse_select("SELECT * FROM users").unwrap();
        assert_eq!(all.projection, Projection::All);
        assert_eq!(all.table, "users");
        assert!(all.predicate.is_none());

        let cols = parse_select("select id, name from users where name='Alice'").unwrap();
        assert_eq!(
            cols.projection,
            Projection::Columns(vec!["id".to_string(), "name".to_string()])
        );
        let predicate = cols.predicate.unwrap();
        assert_eq!(predicate.column, "name");
        assert_eq!(predicate.literal, "Alice");
    }

    #[test]
    fn select_requires_from() {
        assert!(parse_select("SELECT *").is_err());
        assert!(parse_select("SELECT  FROM users").is_err());
    }

    #[test]
    fn dump_filename_defaults() {
        assert_eq!(parse_dump("DUMP").filename, "dump.sql");
        assert_eq!(parse_dump("DUMP backup.sql").filename, "backup.sql");
    }
}
