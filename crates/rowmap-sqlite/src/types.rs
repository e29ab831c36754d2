//! Moving values across the SQLite boundary.
//!
//! SQLite has five storage classes (INTEGER, REAL, TEXT, BLOB, NULL). Every
//! `Value` variant binds to one of them; booleans bind as 0/1 and come back
//! as `Value::Integer`, which `bool`'s decoder accepts.

#![allow(clippy::cast_sign_loss)]

use crate::ffi;
use rowmap_core::Value;
use std::ffi::{CStr, c_int};

/// Bind a Value to a prepared statement parameter.
///
/// Returns the SQLite result code; `SQLITE_TOOBIG` for text or blobs that do
/// not fit a C int length.
///
/// # Safety
/// - `stmt` must be a valid, non-null prepared statement handle
/// - `index` must be a 1-based parameter index
pub unsafe fn bind_value(stmt: *mut ffi::sqlite3_stmt, index: c_int, value: &Value) -> c_int {
    // SAFETY: caller guarantees `stmt`; buffers are copied (SQLITE_TRANSIENT).
    unsafe {
        match value {
            Value::Null => ffi::sqlite3_bind_null(stmt, index),
            Value::Bool(b) => ffi::sqlite3_bind_int64(stmt, index, i64::from(*b)),
            Value::Integer(v) => ffi::sqlite3_bind_int64(stmt, index, *v),
            Value::Double(v) => ffi::sqlite3_bind_double(stmt, index, *v),
            Value::Text(s) => {
                let Ok(len) = c_int::try_from(s.len()) else {
                    return ffi::SQLITE_TOOBIG;
                };
                ffi::sqlite3_bind_text(stmt, index, s.as_ptr().cast(), len, ffi::transient())
            }
            Value::Bytes(b) => {
                let Ok(len) = c_int::try_from(b.len()) else {
                    return ffi::SQLITE_TOOBIG;
                };
                ffi::sqlite3_bind_blob(stmt, index, b.as_ptr().cast(), len, ffi::transient())
            }
        }
    }
}

/// Read a column value from the current result row.
///
/// # Safety
/// - `stmt` must be a valid prepared statement that has just returned SQLITE_ROW
/// - `index` must be a valid 0-based column index
pub unsafe fn read_column(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Value {
    // SAFETY: caller guarantees a current row; pointers returned by SQLite
    // stay valid until the next step/reset, and we copy out of them here.
    unsafe {
        match ffi::sqlite3_column_type(stmt, index) {
            ffi::SQLITE_NULL => Value::Null,

            ffi::SQLITE_INTEGER => Value::Integer(ffi::sqlite3_column_int64(stmt, index)),

            ffi::SQLITE_FLOAT => Value::Double(ffi::sqlite3_column_double(stmt, index)),

            ffi::SQLITE_TEXT => {
                let ptr = ffi::sqlite3_column_text(stmt, index);
                let len = ffi::sqlite3_column_bytes(stmt, index);
                if ptr.is_null() {
                    Value::Null
                } else {
                    let slice = std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize);
                    // Text that is not UTF-8 surfaces as raw bytes.
                    match String::from_utf8(slice.to_vec()) {
                        Ok(text) => Value::Text(text),
                        Err(err) => Value::Bytes(err.into_bytes()),
                    }
                }
            }

            ffi::SQLITE_BLOB => {
                let ptr = ffi::sqlite3_column_blob(stmt, index);
                let len = ffi::sqlite3_column_bytes(stmt, index);
                if ptr.is_null() || len == 0 {
                    Value::Bytes(Vec::new())
                } else {
                    let slice = std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize);
                    Value::Bytes(slice.to_vec())
                }
            }

            _ => Value::Null,
        }
    }
}

/// Get the name of a result column.
///
/// # Safety
/// - `stmt` must be a valid prepared statement
/// - `index` must be a valid 0-based column index
pub unsafe fn column_name(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Option<String> {
    // SAFETY: caller guarantees `stmt` and `index`
    unsafe {
        let ptr = ffi::sqlite3_column_name(stmt, index);
        if ptr.is_null() {
            None
        } else {
            Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::SqliteConnection;
    use crate::statement::Step;
    use rowmap_core::Value;

    fn echo(value: Value) -> Value {
        let conn = SqliteConnection::open_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?;").unwrap();
        stmt.bind(1, &value).unwrap();
        assert_eq!(stmt.step().unwrap(), Step::Row);
        stmt.read_row().into_values().remove(0)
    }

    #[test]
    fn test_storage_classes() {
        assert_eq!(echo(Value::Null), Value::Null);
        assert_eq!(echo(Value::Integer(-7)), Value::Integer(-7));
        assert_eq!(echo(Value::Double(2.5)), Value::Double(2.5));
        assert_eq!(echo(Value::Text("héllo".into())), Value::Text("héllo".into()));
        assert_eq!(
            echo(Value::Bytes(vec![0, 159, 146, 150])),
            Value::Bytes(vec![0, 159, 146, 150])
        );
    }

    #[test]
    fn test_bool_binds_as_integer() {
        assert_eq!(echo(Value::Bool(true)), Value::Integer(1));
        assert_eq!(echo(Value::Bool(false)), Value::Integer(0));
    }

    #[test]
    fn test_empty_blob_is_not_null() {
        assert_eq!(echo(Value::Bytes(Vec::new())), Value::Bytes(Vec::new()));
    }

    #[test]
    fn test_invalid_utf8_text_reads_as_bytes() {
        let conn = SqliteConnection::open_memory().unwrap();
        let mut stmt = conn.prepare("SELECT CAST(? AS TEXT), typeof(CAST(? AS TEXT));").unwrap();
        stmt.bind(1, &Value::Bytes(vec![0x61, 0xff, 0xfe])).unwrap();
        stmt.bind(2, &Value::Bytes(vec![0x61, 0xff, 0xfe])).unwrap();
        assert_eq!(stmt.step().unwrap(), Step::Row);
        let mut values = stmt.read_row().into_values();
        assert_eq!(values.remove(1), Value::Text("text".into()));

        let value = values.remove(0);
        assert_eq!(value, Value::Bytes(vec![0x61, 0xff, 0xfe]));
        let err = String::try_from(value).unwrap_err();
        assert!(matches!(err, rowmap_core::Error::Type(_)));
    }
}
