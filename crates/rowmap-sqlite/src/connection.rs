//! SQLite connection.
//!
//! `SqliteConnection` owns one native database handle. It is `Send` but not
//! `Sync`: callers that share it across threads serialize access themselves.
//! Statements and cursors borrow the connection, so none of them can outlive
//! it.

#![allow(clippy::cast_sign_loss)]

use crate::ffi;
use crate::statement::Statement;
use rowmap_core::error::{ConnectionError, ConnectionErrorKind, QueryError, QueryErrorKind};
use rowmap_core::{Error, Result};
use serde::Deserialize;
use std::ffi::{CStr, CString, c_int};
use std::path::Path;
use std::ptr;

/// Configuration for opening SQLite connections.
///
/// Deserializable so it can live in an application's config file; missing
/// keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to the database file, a `file:` URI, or ":memory:".
    pub path: String,
    pub flags: OpenFlags,
    /// Busy timeout in milliseconds; 0 disables it.
    pub busy_timeout_ms: u32,
}

/// Flags controlling how the database is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OpenFlags {
    /// Open for reading only. Overrides `read_write` and `create`.
    pub read_only: bool,
    pub read_write: bool,
    /// Create the database if it doesn't exist.
    pub create: bool,
    /// Interpret `file:` URIs.
    pub uri: bool,
    /// Multi-thread mode.
    pub no_mutex: bool,
    /// Serialized mode.
    pub full_mutex: bool,
}

impl OpenFlags {
    const fn empty() -> Self {
        Self {
            read_only: false,
            read_write: false,
            create: false,
            uri: true,
            no_mutex: false,
            full_mutex: false,
        }
    }

    /// Read-only access; the database must exist.
    pub const fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::empty()
        }
    }

    /// Read-write access; the database must exist.
    pub const fn read_write() -> Self {
        Self {
            read_write: true,
            ..Self::empty()
        }
    }

    /// Read-write access, creating the database if needed.
    pub const fn create_read_write() -> Self {
        Self {
            read_write: true,
            create: true,
            ..Self::empty()
        }
    }

    pub(crate) fn to_sqlite_flags(self) -> c_int {
        let mut flags = 0;

        if self.read_only {
            flags |= ffi::SQLITE_OPEN_READONLY;
        } else {
            if self.read_write {
                flags |= ffi::SQLITE_OPEN_READWRITE;
            }
            if self.create {
                flags |= ffi::SQLITE_OPEN_CREATE;
            }
        }
        if self.uri {
            flags |= ffi::SQLITE_OPEN_URI;
        }
        if self.no_mutex {
            flags |= ffi::SQLITE_OPEN_NOMUTEX;
        }
        if self.full_mutex {
            flags |= ffi::SQLITE_OPEN_FULLMUTEX;
        }

        // Default to read-write if no mode specified
        if flags & (ffi::SQLITE_OPEN_READONLY | ffi::SQLITE_OPEN_READWRITE) == 0 {
            flags |= ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE;
        }

        flags
    }
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self::create_read_write()
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            flags: OpenFlags::default(),
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Config for a file-based database.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Config for a private in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = ms;
        self
    }
}

/// A connection to a SQLite database.
pub struct SqliteConnection {
    db: *mut ffi::sqlite3,
    path: String,
}

// SAFETY: the handle is only used through `&self` on one thread at a time
// (the type is not `Sync`), and SQLite handles may move between threads.
unsafe impl Send for SqliteConnection {}

impl SqliteConnection {
    /// Open a connection with the given configuration.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let c_path = CString::new(config.path.as_str()).map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::InvalidPath,
                path: config.path.clone(),
                message: "path contains a NUL byte".to_string(),
            })
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &raw mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let message = if db.is_null() {
                ffi::error_string(rc).to_string()
            } else {
                // SAFETY: a handle is allocated even on failure and must be closed
                unsafe {
                    let msg = errmsg(db);
                    ffi::sqlite3_close_v2(db);
                    msg
                }
            };

            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Open,
                path: config.path.clone(),
                message: format!("failed to open database: {}", message),
            }));
        }

        if config.busy_timeout_ms > 0 {
            let ms = c_int::try_from(config.busy_timeout_ms).unwrap_or(c_int::MAX);
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(db, ms);
            }
        }

        tracing::debug!(path = %config.path, flags, "opened sqlite database");

        Ok(Self {
            db,
            path: config.path.clone(),
        })
    }

    /// Open a private in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::open(&SqliteConfig::memory())
    }

    /// Open (creating if absent) a file-based database.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path = path.to_str().ok_or_else(|| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::InvalidPath,
                path: path.display().to_string(),
                message: "path is not valid UTF-8".to_string(),
            })
        })?;
        Self::open(&SqliteConfig::file(path))
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Execute one or more statements immediately, without binding.
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        tracing::trace!(sql = %sql, "exec");

        let c_sql = CString::new(sql).map_err(|_| nul_in_sql(sql, QueryErrorKind::Exec))?;
        let mut errmsg: *mut std::ffi::c_char = ptr::null_mut();

        // SAFETY: All pointers are valid
        let rc = unsafe {
            ffi::sqlite3_exec(
                self.db,
                c_sql.as_ptr(),
                None,
                ptr::null_mut(),
                &raw mut errmsg,
            )
        };

        if rc != ffi::SQLITE_OK {
            let message = if errmsg.is_null() {
                ffi::error_string(rc).to_string()
            } else {
                // SAFETY: errmsg was allocated by SQLite and is freed here
                unsafe {
                    let msg = CStr::from_ptr(errmsg).to_string_lossy().into_owned();
                    ffi::sqlite3_free(errmsg.cast());
                    msg
                }
            };

            return Err(Error::Query(QueryError {
                kind: QueryErrorKind::Exec,
                sql: Some(sql.to_string()),
                code: Some(rc & 0xff),
                message,
            }));
        }

        Ok(())
    }

    /// Prepare a statement.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        Statement::prepare(self, sql)
    }

    /// Rowid of the most recent successful insert on this connection.
    pub fn last_insert_rowid(&self) -> i64 {
        // SAFETY: db is valid
        unsafe { ffi::sqlite3_last_insert_rowid(self.db) }
    }

    /// Number of rows changed by the most recent INSERT, UPDATE or DELETE.
    pub fn changes(&self) -> u64 {
        // SAFETY: db is valid
        let changes = unsafe { ffi::sqlite3_changes(self.db) };
        changes.max(0) as u64
    }

    pub(crate) fn handle(&self) -> *mut ffi::sqlite3 {
        self.db
    }

    /// Build a query error from the connection's current error state.
    pub(crate) fn last_error(&self, kind: QueryErrorKind, sql: &str, context: Option<String>) -> Error {
        // SAFETY: db is valid
        let (code, message) = unsafe { (ffi::sqlite3_errcode(self.db), errmsg(self.db)) };
        let message = match context {
            Some(context) => format!("{}: {}", context, message),
            None => message,
        };
        Error::Query(QueryError {
            kind,
            sql: Some(sql.to_string()),
            code: Some(code & 0xff),
            message,
        })
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if self.db.is_null() {
            return;
        }
        // SAFETY: db is valid and no statement borrows it any more
        let rc = unsafe { ffi::sqlite3_close_v2(self.db) };
        if rc == ffi::SQLITE_OK {
            tracing::debug!(path = %self.path, "closed sqlite database");
        } else {
            tracing::warn!(path = %self.path, code = rc, error = ffi::error_string(rc), "failed to close sqlite database");
        }
    }
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// # Safety
/// `db` must be a valid handle.
unsafe fn errmsg(db: *mut ffi::sqlite3) -> String {
    // SAFETY: errmsg returns a valid C string owned by SQLite
    unsafe { CStr::from_ptr(ffi::sqlite3_errmsg(db)).to_string_lossy().into_owned() }
}

pub(crate) fn nul_in_sql(sql: &str, kind: QueryErrorKind) -> Error {
    Error::Query(QueryError {
        kind,
        sql: Some(sql.to_string()),
        code: None,
        message: "SQL contains a NUL byte".to_string(),
    })
}
