//! SQLite driver for rowmap.
//!
//! This crate owns everything that touches the store: opening and closing
//! connections, preparing and stepping statements, lazy row cursors, and the
//! record-level verbs (`init`, `select`, `insert`, `update`, `delete`, plus
//! `insert_one`, `upsert` and `drop_table`).
//!
//! # Example
//!
//! ```rust,ignore
//! use rowmap_sqlite::SqliteConnection;
//! use rowmap_query::{OrderBy, Where};
//!
//! let conn = SqliteConnection::open_memory()?;
//! conn.init::<User>(false)?;
//! conn.insert(&users)?;
//! for user in conn.select(&Where::new().gt(User::COUNT, 10), &OrderBy::new())? {
//!     println!("{:?}", user?);
//! }
//! ```
//!
//! # Type Mapping
//!
//! | Rust Type | Declared column type | Stored as |
//! |-----------|----------------------|-----------|
//! | `bool` | BOOLEAN | INTEGER (0/1) |
//! | integers, `RowId` | INTEGER | INTEGER |
//! | `f32`, `f64` | REAL | REAL |
//! | `String` | TEXT | TEXT |
//! | `Vec<u8>` | BLOB | BLOB |
//! | `#[derive(SqlEnum)]` enums | ENUM | TEXT (variant name) |
//! | `chrono::DateTime` | DATETIME | TEXT (`%Y-%m-%dT%H:%M:%S%z`) |
//! | `Option<T>` | as `T`, nullable | NULL or `T` |
//!
//! # Thread Safety
//!
//! `SqliteConnection` is `Send` but not `Sync`.

// FFI bindings require unsafe code
#![allow(unsafe_code)]

pub mod connection;
pub mod crud;
pub mod cursor;
pub mod ffi;
pub mod statement;
pub mod types;

pub use connection::{OpenFlags, SqliteConfig, SqliteConnection};
pub use cursor::RowCursor;
pub use statement::{Statement, Step};

/// The SQLite library version.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

/// The SQLite library version number.
pub fn sqlite_version_number() -> i32 {
    ffi::version_number()
}
