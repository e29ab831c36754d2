//! Prepared statements.

#![allow(clippy::cast_sign_loss)]

use crate::connection::{SqliteConnection, nul_in_sql};
use crate::ffi;
use crate::types;
use rowmap_core::error::{QueryError, QueryErrorKind};
use rowmap_core::{ColumnInfo, Error, Result, Row, Value};
use std::ffi::{CString, c_int};
use std::ptr;
use std::sync::Arc;

/// Outcome of one `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A result row is available through [`Statement::read_row`].
    Row,
    /// The statement has run to completion.
    Done,
}

/// A prepared statement borrowed from its connection.
///
/// Finalized on drop.
pub struct Statement<'conn> {
    conn: &'conn SqliteConnection,
    stmt: *mut ffi::sqlite3_stmt,
    sql: String,
    columns: Arc<ColumnInfo>,
}

impl<'conn> Statement<'conn> {
    pub(crate) fn prepare(conn: &'conn SqliteConnection, sql: &str) -> Result<Self> {
        tracing::trace!(sql = %sql, "prepare");

        let c_sql = CString::new(sql).map_err(|_| nul_in_sql(sql, QueryErrorKind::Syntax))?;
        let len = c_int::try_from(c_sql.as_bytes().len()).unwrap_or(c_int::MAX);
        let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();

        // SAFETY: All pointers are valid
        let rc = unsafe {
            ffi::sqlite3_prepare_v3(
                conn.handle(),
                c_sql.as_ptr(),
                len,
                ffi::SQLITE_PREPARE_PERSISTENT,
                &raw mut stmt,
                ptr::null_mut(),
            )
        };

        if rc != ffi::SQLITE_OK {
            return Err(conn.last_error(QueryErrorKind::Syntax, sql, None));
        }
        if stmt.is_null() {
            // Only whitespace or comments.
            return Err(Error::Query(QueryError {
                kind: QueryErrorKind::Syntax,
                sql: Some(sql.to_string()),
                code: None,
                message: "empty statement".to_string(),
            }));
        }

        // SAFETY: stmt is valid
        let count = unsafe { ffi::sqlite3_column_count(stmt) };
        let names = (0..count)
            // SAFETY: stmt is valid, i is in range
            .map(|i| unsafe { types::column_name(stmt, i) }.unwrap_or_else(|| format!("col{}", i)))
            .collect();

        Ok(Self {
            conn,
            stmt,
            sql: sql.to_string(),
            columns: Arc::new(ColumnInfo::new(names)),
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of `?` placeholders.
    pub fn parameter_count(&self) -> usize {
        // SAFETY: stmt is valid
        unsafe { ffi::sqlite3_bind_parameter_count(self.stmt) }.max(0) as usize
    }

    /// Result columns shared by every row this statement reads.
    pub fn columns(&self) -> &Arc<ColumnInfo> {
        &self.columns
    }

    /// Bind one parameter; `index` is 1-based.
    pub fn bind(&mut self, index: usize, value: &Value) -> Result<()> {
        let rc = match c_int::try_from(index) {
            // SAFETY: stmt is valid; SQLite range-checks the index
            Ok(i) => unsafe { types::bind_value(self.stmt, i, value) },
            Err(_) => ffi::SQLITE_RANGE,
        };
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(self.conn.last_error(
                QueryErrorKind::Bind,
                &self.sql,
                Some(format!(
                    "failed to bind parameter {} ({})",
                    index,
                    ffi::error_string(rc)
                )),
            ))
        }
    }

    /// Bind values to placeholders 1..=n in order.
    pub fn bind_all(&mut self, values: &[Value]) -> Result<()> {
        for (i, value) in values.iter().enumerate() {
            self.bind(i + 1, value)?;
        }
        Ok(())
    }

    /// Advance the statement.
    pub fn step(&mut self) -> Result<Step> {
        // SAFETY: stmt is valid
        match unsafe { ffi::sqlite3_step(self.stmt) } {
            ffi::SQLITE_ROW => Ok(Step::Row),
            ffi::SQLITE_DONE => Ok(Step::Done),
            _ => Err(self.conn.last_error(QueryErrorKind::Step, &self.sql, None)),
        }
    }

    /// Copy out the current row. Only meaningful right after [`Step::Row`].
    pub fn read_row(&self) -> Row {
        let count = c_int::try_from(self.columns.len()).unwrap_or(c_int::MAX);
        let values = (0..count)
            // SAFETY: stmt is valid and positioned on a row
            .map(|i| unsafe { types::read_column(self.stmt, i) })
            .collect();
        Row::with_columns(Arc::clone(&self.columns), values)
    }

    /// Rewind so the statement can run again. Bindings are kept.
    pub fn reset(&mut self) {
        // The return code repeats the last step's error, already reported.
        // SAFETY: stmt is valid
        unsafe {
            ffi::sqlite3_reset(self.stmt);
        }
    }

    /// Set every parameter back to NULL.
    pub fn clear_bindings(&mut self) {
        // SAFETY: stmt is valid
        unsafe {
            ffi::sqlite3_clear_bindings(self.stmt);
        }
    }

    /// Bind, run to completion, then reset and clear bindings so the
    /// statement can be reused for the next set of values.
    pub fn execute(&mut self, values: &[Value]) -> Result<()> {
        let result = self.bind_all(values).and_then(|()| {
            while self.step()? == Step::Row {}
            Ok(())
        });
        self.reset();
        self.clear_bindings();
        result
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        // SAFETY: stmt is valid and not used after this
        let rc = unsafe { ffi::sqlite3_finalize(self.stmt) };
        if rc != ffi::SQLITE_OK {
            tracing::trace!(sql = %self.sql, code = rc, "finalize reported the last step error");
        }
    }
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("columns", &self.columns.names())
            .finish_non_exhaustive()
    }
}
