//! Field and column definitions.

use crate::types::SqlType;
use std::fmt;
use std::marker::PhantomData;

/// Metadata about a model field/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Database column name (snake_case of the field name)
    pub column_name: &'static str,
    /// SQL type for this field
    pub sql_type: SqlType,
    /// Whether this field is nullable (an `Option`)
    pub nullable: bool,
    /// Whether this is the row identifier column
    pub primary_key: bool,
}

impl FieldInfo {
    /// Create a new field info with minimal required data.
    pub const fn new(name: &'static str, column_name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            column_name,
            sql_type,
            nullable: false,
            primary_key: false,
        }
    }

    /// Set nullable flag.
    pub const fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Set primary key flag.
    pub const fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }
}

/// Typed selector for one field of model `M` holding values of type `V`.
///
/// `#[derive(Model)]` emits one associated const per field, named after the
/// field in upper case (`User::COUNT`). The selector carries the column's
/// declaration-order index, which is what WHERE/ORDER BY descriptors store.
pub struct Column<M, V> {
    index: usize,
    name: &'static str,
    _marker: PhantomData<fn() -> (M, V)>,
}

impl<M, V> Column<M, V> {
    pub const fn new(index: usize, name: &'static str) -> Self {
        Self {
            index,
            name,
            _marker: PhantomData,
        }
    }

    /// Zero-based declaration index of the field.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Column name of the field.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: the derives would put bounds on M and V.
impl<M, V> Clone for Column<M, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, V> Copy for Column<M, V> {}

impl<M, V> PartialEq for Column<M, V> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<M, V> Eq for Column<M, V> {}

impl<M, V> fmt::Debug for Column<M, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ledger;

    #[test]
    fn test_field_info_builder() {
        const INFO: FieldInfo = FieldInfo::new("user_id", "user_id", SqlType::Integer)
            .nullable(true)
            .primary_key(false);
        assert!(INFO.nullable);
        assert!(!INFO.primary_key);
        assert_eq!(INFO.sql_type.sql_name(), "INTEGER");
    }

    #[test]
    fn test_column_selector() {
        const COUNT: Column<Ledger, i64> = Column::new(1, "count");
        let copy = COUNT;
        assert_eq!(copy.index(), 1);
        assert_eq!(copy.name(), "count");
        assert_eq!(copy, COUNT);
        assert_eq!(format!("{:?}", COUNT), "Column { index: 1, name: \"count\" }");
    }
}
