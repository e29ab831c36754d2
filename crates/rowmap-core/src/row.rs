//! Database row representation.

use crate::Result;
use crate::error::{Error, TypeError};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Column metadata shared across all rows in a result set.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    names: Vec<String>,
    name_to_index: HashMap<String, usize>,
}

impl ColumnInfo {
    /// Create new column info from a list of column names.
    pub fn new(names: Vec<String>) -> Self {
        let name_to_index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names,
            name_to_index,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get the index of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Get the name of a column by index.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// A single row read from a statement.
///
/// Rows from the same statement share their [`ColumnInfo`].
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<Value>,
    columns: Arc<ColumnInfo>,
}

impl Row {
    /// Create a new row with the given columns and values.
    pub fn new(column_names: Vec<String>, values: Vec<Value>) -> Self {
        Self::with_columns(Arc::new(ColumnInfo::new(column_names)), values)
    }

    /// Create a new row with shared column metadata.
    pub fn with_columns(columns: Arc<ColumnInfo>, values: Vec<Value>) -> Self {
        Self { values, columns }
    }

    pub fn column_info(&self) -> Arc<ColumnInfo> {
        Arc::clone(&self.columns)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by column name.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Decode the value at `index` into `T`.
    ///
    /// Failures carry the column name.
    pub fn get_as<T>(&self, index: usize) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        let value = self.get(index).ok_or_else(|| {
            Error::Type(TypeError {
                expected: std::any::type_name::<T>(),
                actual: format!(
                    "index {} out of bounds (row has {} columns)",
                    index,
                    self.len()
                ),
                column: None,
            })
        })?;
        let column = self.columns.name_at(index).unwrap_or("?");
        T::try_from(value.clone()).map_err(|e| e.with_column(column))
    }

    /// Decode the value of the named column into `T`.
    pub fn get_named<T>(&self, name: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        let index = self.columns.index_of(name).ok_or_else(|| {
            Error::Type(TypeError {
                expected: std::any::type_name::<T>(),
                actual: format!("missing column '{}'", name),
                column: Some(name.to_string()),
            })
        })?;
        self.get_as(index)
    }

    /// Iterate over column values in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Consume the row, returning its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaErrorKind;

    fn sample() -> Row {
        Row::new(
            vec!["id".to_string(), "count".to_string(), "note".to_string()],
            vec![Value::Integer(4), Value::Integer(10), Value::Null],
        )
    }

    #[test]
    fn test_index_and_name_access() {
        let row = sample();
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(1), Some(&Value::Integer(10)));
        assert_eq!(row.get_by_name("note"), Some(&Value::Null));
        assert_eq!(row.get_as::<i64>(0).unwrap(), 4);
        assert_eq!(row.get_named::<i32>("count").unwrap(), 10);
        assert_eq!(row.get_named::<Option<String>>("note").unwrap(), None);
    }

    #[test]
    fn test_null_into_required_names_column() {
        let err = sample().get_as::<String>(2).unwrap_err();
        match err {
            Error::Schema(e) => {
                assert_eq!(e.kind, SchemaErrorKind::Mismatch);
                assert!(e.message.contains("'note'"));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let err = sample().get_as::<i64>(7).unwrap_err();
        assert!(err.to_string().contains("index 7 out of bounds"));
    }

    #[test]
    fn test_shared_columns() {
        let row = sample();
        let other = Row::with_columns(row.column_info(), vec![Value::Integer(1); 3]);
        assert!(Arc::ptr_eq(&row.column_info(), &other.column_info()));
        assert_eq!(other.into_values().len(), 3);
    }
}
