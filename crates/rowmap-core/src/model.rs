//! Model trait for record-to-row mapping.
//!
//! The `Model` trait is the reflected schema of one record type. It is
//! derived with `#[derive(Model)]` from `rowmap-macros`; the derive reads
//! nothing but the struct's fields, in declaration order.

use crate::Result;
use crate::error::Error;
use crate::field::FieldInfo;
use crate::row::Row;
use crate::row_id::RowId;
use crate::value::Value;

/// Trait for types that can be mapped to database tables.
pub trait Model: Sized {
    /// The name of the database table.
    ///
    /// snake_case of the type name, with a trailing `s` when the type has a
    /// row identifier.
    const TABLE_NAME: &'static str;

    /// Whether the first field is a [`RowId`].
    const HAS_ROW_ID: bool;

    /// Get field metadata for all columns, in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Encode every field, in column order.
    fn to_values(&self) -> Vec<Value>;

    /// Decode a record from a row whose columns are in declaration order.
    fn from_row(row: &Row) -> Result<Self>;

    /// The row identifier, if the type has one.
    fn row_id(&self) -> Option<RowId>;

    /// Store a row identifier assigned by the database. No-op without one.
    fn set_row_id(&mut self, id: RowId);

    /// Resolve a field or column name to its declaration index.
    fn column_index(name: &str) -> Result<usize> {
        Self::fields()
            .iter()
            .position(|f| f.name == name || f.column_name == name)
            .ok_or_else(|| Error::field_not_found(Self::TABLE_NAME, name))
    }

    /// Column name at a declaration index.
    ///
    /// Indices come from generated selectors and are always in range.
    fn column_name(index: usize) -> &'static str {
        Self::fields()[index].column_name
    }

    /// The row identifier column, if any.
    fn row_id_field() -> Option<&'static FieldInfo> {
        if Self::HAS_ROW_ID {
            Self::fields().first()
        } else {
            None
        }
    }
}
