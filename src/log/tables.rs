//! Insertion-ordered column storage for step and measurement data
//!
//! Both the step table and the measurement table are mappings from a column
//! name to the sequence of values that column takes across sweep steps.
//! Export reproduces columns in the order they were first seen, so the
//! backing container must preserve insertion order.

use indexmap::IndexMap;

use crate::value::CoercedValue;

/// An ordered name-to-sequence mapping
///
/// Used in two roles: as the step table (one entry per `.step` parameter)
/// and as the measurement table (one entry per measurement column). All
/// sequences of a step table have equal length, the step count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTable {
    columns: IndexMap<String, Vec<CoercedValue>>,
}

impl ColumnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Length of the first column, which is the row count for any table
    /// whose columns are aligned
    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .map(|(_, values)| values.len())
            .unwrap_or(0)
    }

    /// Column names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[CoercedValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Append a value to a column, creating the column on first sight
    pub fn push(&mut self, name: &str, value: CoercedValue) {
        match self.columns.get_mut(name) {
            Some(values) => values.push(value),
            None => {
                self.columns.insert(name.to_string(), vec![value]);
            }
        }
    }

    /// Insert a whole column, replacing any previous one of the same name
    pub fn insert_column(&mut self, name: String, values: Vec<CoercedValue>) {
        self.columns.insert(name, values);
    }

    /// Remove a column, keeping the order of the remaining ones
    pub fn remove(&mut self, name: &str) -> Option<Vec<CoercedValue>> {
        self.columns.shift_remove(name)
    }

    /// Iterate columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CoercedValue])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}
