//! SQL type definitions and mapping.

use crate::row_id::RowId;
use chrono::{DateTime, FixedOffset, Utc};

/// Column type categories a record field can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    /// Integers and row identifiers
    Integer,
    /// Enumerations stored as their symbolic name
    Enum,
    Real,
    Text,
    Blob,
    /// Timestamps stored as offset-qualified text
    DateTime,
}

impl SqlType {
    /// Get the SQL type name used in `CREATE TABLE`.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::Integer => "INTEGER",
            SqlType::Enum => "ENUM",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
            SqlType::DateTime => "DATETIME",
        }
    }
}

/// Trait for field types that have a corresponding SQL type.
///
/// `#[derive(Model)]` reads these constants for every field, so a field type
/// without a `TypeInfo` impl is a compile error.
pub trait TypeInfo {
    /// The SQL type for this Rust type.
    const SQL_TYPE: SqlType;

    /// Whether this type is nullable.
    const NULLABLE: bool = false;

    /// Whether this type is the row identifier.
    const ROW_ID: bool = false;
}

macro_rules! impl_type_info {
    ($sql:ident => $($ty:ty),* $(,)?) => {
        $(
            impl TypeInfo for $ty {
                const SQL_TYPE: SqlType = SqlType::$sql;
            }
        )*
    };
}

impl_type_info!(Boolean => bool);
impl_type_info!(Integer => i8, i16, i32, i64, u8, u16, u32);
impl_type_info!(Real => f32, f64);
impl_type_info!(Text => String);
impl_type_info!(Blob => Vec<u8>);
impl_type_info!(DateTime => DateTime<FixedOffset>, DateTime<Utc>);

impl TypeInfo for RowId {
    const SQL_TYPE: SqlType = SqlType::Integer;
    const ROW_ID: bool = true;
}

impl<T: TypeInfo> TypeInfo for Option<T> {
    const SQL_TYPE: SqlType = T::SQL_TYPE;
    const NULLABLE: bool = true;
    const ROW_ID: bool = T::ROW_ID;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(<bool as TypeInfo>::SQL_TYPE.sql_name(), "BOOLEAN");
        assert_eq!(<u16 as TypeInfo>::SQL_TYPE.sql_name(), "INTEGER");
        assert_eq!(<RowId as TypeInfo>::SQL_TYPE.sql_name(), "INTEGER");
        assert_eq!(<f32 as TypeInfo>::SQL_TYPE.sql_name(), "REAL");
        assert_eq!(<String as TypeInfo>::SQL_TYPE.sql_name(), "TEXT");
        assert_eq!(<Vec<u8> as TypeInfo>::SQL_TYPE.sql_name(), "BLOB");
        assert_eq!(
            <DateTime<Utc> as TypeInfo>::SQL_TYPE.sql_name(),
            "DATETIME"
        );
    }

    #[test]
    fn test_option_is_nullable() {
        assert!(!<i64 as TypeInfo>::NULLABLE);
        assert!(<Option<i64> as TypeInfo>::NULLABLE);
        assert_eq!(<Option<String> as TypeInfo>::SQL_TYPE, SqlType::Text);
    }

    #[test]
    fn test_row_id_flag() {
        assert!(<RowId as TypeInfo>::ROW_ID);
        assert!(<Option<RowId> as TypeInfo>::ROW_ID);
        assert!(!<i64 as TypeInfo>::ROW_ID);
    }
}
