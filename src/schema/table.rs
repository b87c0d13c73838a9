//! # Tables, Rows, and Hash Indexes
//!
//! A table owns its column definitions, its row vector, and any per-column
//! hash indexes built by `CREATE INDEX`. Row positions are stable between
//! mutations (the engine never deletes), which lets indexes store positions
//! directly into the row vector.
//!
//! ## Index Invariant
//!
//! For every index on column `c` and every recorded key `v`, the recorded
//! positions are exactly `{i | rows[i][c] == v}`. INSERT appends the new
//! position to the matching bucket; UPDATE moves a position between buckets
//! whenever an assignment changes an indexed cell. Indexes are not
//! persisted; after a reload they exist only once rebuilt by an explicit
//! `CREATE INDEX`.
//!
//! ## Locking
//!
//! `Table` itself is unsynchronized. The catalog wraps each table in
//! `Arc<parking_lot::RwLock<Table>>`; executors take the table lock nested
//! inside the catalog lock.

use hashbrown::HashMap as IndexMap;

use crate::types::{Column, Value};

/// One table row; width always equals the owning table's column count.
pub type Row = Vec<Value>;

/// Hash index over a single column: value → row positions in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Index {
    buckets: IndexMap<Value, Vec<usize>>,
}

impl Index {
    /// Builds an index over `rows` for the column at `pos`.
    fn build(pos: usize, rows: &[Row]) -> Self {
        let mut index = Index::default();
        for (row_pos, row) in rows.iter().enumerate() {
            index.record(row[pos].clone(), row_pos);
        }
        index
    }

    fn record(&mut self, value: Value, row_pos: usize) {
        self.buckets.entry(value).or_default().push(row_pos);
    }

    /// Moves `row_pos` from the `old` bucket to the `new` bucket.
    fn reposition(&mut self, old: &Value, new: Value, row_pos: usize) {
        if let Some(bucket) = self.buckets.get_mut(old) {
            bucket.retain(|&p| p != row_pos);
            if bucket.is_empty() {
                self.buckets.remove(old);
            }
        }
        self.record(new, row_pos);
    }

    /// Row positions recorded for `value`, if any.
    pub fn positions(&self, value: &Value) -> Option<&[usize]> {
        self.buckets.get(value).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> impl Iterator<Item = &Value> {
        self.buckets.keys()
    }
}

/// In-memory table: columns, rows, and per-column indexes.
#[derive(Debug)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
    indexes: std::collections::HashMap<String, Index>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            indexes: std::collections::HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Position of a column by its case-sensitive name.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn index(&self, column: &str) -> Option<&Index> {
        self.indexes.get(column)
    }

    /// Appends a typed row and records its position in every index.
    ///
    /// Callers must have validated the row width and value types.
    pub fn append_row(&mut self, row: Row) {
        debug_assert_eq!(row.len(), self.columns.len());
        let row_pos = self.rows.len();
        for (col, index) in &mut self.indexes {
            if let Some(pos) = self.columns.iter().position(|c| &c.name == col) {
                index.record(row[pos].clone(), row_pos);
            }
        }
        self.rows.push(row);
    }

    /// Builds (or rebuilds) the hash index for the column at `pos`.
    pub fn build_index(&mut self, pos: usize) {
        let column = self.columns[pos].name.clone();
        let index = Index::build(pos, &self.rows);
        self.indexes.insert(column, index);
    }

    /// Applies `assignments` to every row whose `cond_pos` cell equals
    /// `cond`, maintaining affected indexes. Returns the number of rows
    /// updated.
    pub fn update_where(
        &mut self,
        cond_pos: usize,
        cond: &Value,
        assignments: &[(usize, Value)],
    ) -> usize {
        let Table {
            columns,
            rows,
            indexes,
            ..
        } = self;

        let mut updated = 0;
        for (row_pos, row) in rows.iter_mut().enumerate() {
            if &row[cond_pos] != cond {
                continue;
            }
            for (pos, new_value) in assignments {
                let old_value = &row[*pos];
                if old_value != new_value {
                    if let Some(index) = indexes.get_mut(&columns[*pos].name) {
                        index.reposition(old_value, new_value.clone(), row_pos);
                    }
                }
                row[*pos] = new_value.clone();
            }
            updated += 1;
        }
        updated
    }

    /// Full copy of the table, including rows and index buckets.
    pub fn deep_clone(&self) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            indexes: self.indexes.clone(),
        }
    }
}
