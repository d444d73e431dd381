use indexmap::IndexMap;

use crate::generate::value::Value;

/// A generated table stored column-major.
///
/// Columns are kept in an `IndexMap` (not `HashMap`) so iteration follows the
/// order the columns were requested in, which keeps CSV/JSON output stable.
/// Every column holds exactly `row_count` values.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTable {
    columns: IndexMap<String, Vec<Value>>,
    row_count: usize,
}

impl GeneratedTable {
    pub(crate) fn with_row_count(row_count: usize) -> Self {
        Self {
            columns: IndexMap::new(),
            row_count,
        }
    }

    pub(crate) fn push_column(&mut self, name: String, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.row_count);
        self.columns.insert(name, values);
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// The values of row `index`, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.values().map(|col| &col[index]).collect())
    }

    /// Iterate rows in order, each as a vector of values in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count).map(move |i| self.columns.values().map(|col| &col[i]).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }
}
