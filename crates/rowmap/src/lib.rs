//! rowmap - map plain Rust structs to SQLite rows, reflected at compile time.
//!
//! A record type's field layout is its schema. `#[derive(Model)]` turns it
//! into a table name, a column list and typed field selectors; the
//! connection generates every statement from that and nothing else.
//!
//! - One table per record type, one column per field, in declaration order
//! - Typed WHERE and ORDER BY built from field selectors such as `User::COUNT`
//! - Lazy, forward-only cursors over SELECT results
//! - A single synchronous connection; no pooling, no transactions
//!
//! # Quick Start
//!
//! ```ignore
//! use rowmap::prelude::*;
//!
//! #[derive(Model, Debug)]
//! struct User {
//!     id: RowId,
//!     count: i64,
//!     duration: f64,
//!     credit: f64,
//! }
//!
//! fn main() -> rowmap::Result<()> {
//!     let conn = SqliteConnection::open_file("bot.db")?;
//!
//!     // CREATE TABLE IF NOT EXISTS users (...)
//!     conn.init::<User>(false)?;
//!
//!     // A zero id lets the store assign one
//!     let user = User { id: RowId::ZERO, count: 1, duration: 0.0, credit: 2.5 };
//!     conn.insert([&user])?;
//!
//!     let busy = Where::new().gt(User::COUNT, 0);
//!     let newest_first = OrderBy::new().desc(User::ID);
//!     for user in conn.select(&busy, &newest_first)? {
//!         println!("{:?}", user?);
//!     }
//!
//!     conn.delete(&Where::new().eq(User::COUNT, 0))?;
//!     Ok(())
//! }
//! ```
//!
//! # Naming
//!
//! The table name is the snake_case of the struct name, with a trailing `s`
//! when the struct has a `RowId` field (`User` -> `users`, `LogEntry` ->
//! `log_entry`). Column names are the snake_case field names; selectors are
//! the SCREAMING_CASE field names.
//!
//! Code generated by the derives refers to `::rowmap_core`, so a crate using
//! them depends on `rowmap-core` as well.

pub use rowmap_core::error::{
    ConnectionError, ConnectionErrorKind, QueryError, QueryErrorKind, SchemaError,
    SchemaErrorKind, TypeError,
};
pub use rowmap_core::{
    Column, ColumnInfo, Error, FieldInfo, Model, Result, Row, RowId, SqlEnum, SqlType,
    TIMESTAMP_FORMAT, TypeInfo, Value,
};

pub use rowmap_macros::{Model, SqlEnum};

pub use rowmap_query::{
    Cmp, DeleteBuilder, InsertBuilder, OrderBy, OrderDirection, OrderParam, SelectBuilder,
    UpdateBuilder, UpsertBuilder, Where, WhereParam,
};

pub use rowmap_schema::{CreateTable, create_table, drop_table_sql, truncate_sql};

pub use rowmap_sqlite::{
    OpenFlags, RowCursor, SqliteConfig, SqliteConnection, Statement, Step, sqlite_version,
    sqlite_version_number,
};

/// Everything a typical caller needs.
pub mod prelude {
    pub use crate::{
        Cmp, Error, Model, OrderBy, OrderDirection, Result, RowId, SqlEnum, SqliteConfig,
        SqliteConnection, Value, Where,
    };
}
