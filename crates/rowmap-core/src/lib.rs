//! Core types and traits for rowmap.
//!
//! This crate provides the foundations shared by the other rowmap crates:
//!
//! - `Value`, the primitive union every field reduces to at the store boundary
//! - `Model`, the reflected schema of a record type
//! - `FieldInfo` and `Column` for column metadata and typed field selectors
//! - `RowId`, the identity field type
//! - `Row`, a decoded result row
//! - `quote_ident` for table and column names in generated SQL
//! - `Error` and `Result`

pub mod enums;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod model;
pub mod row;
pub mod row_id;
pub mod timestamp;
pub mod types;
pub mod value;

pub use enums::SqlEnum;
pub use error::{Error, Result};
pub use field::{Column, FieldInfo};
pub use identifiers::quote_ident;
pub use model::Model;
pub use row::{ColumnInfo, Row};
pub use row_id::RowId;
pub use timestamp::TIMESTAMP_FORMAT;
pub use types::{SqlType, TypeInfo};
pub use value::Value;
