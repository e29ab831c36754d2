//! Error types for rowmap operations.

use std::fmt;

/// The primary error type for all rowmap operations.
#[derive(Debug)]
pub enum Error {
    /// The backing store could not be opened or created
    Connection(ConnectionError),
    /// The store rejected a prepare, execute, bind or step
    Query(QueryError),
    /// A stored value could not be decoded into the requested field type
    Type(TypeError),
    /// A record type was used in a way its schema does not allow
    Schema(SchemaError),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// The store refused to open the database
    Open,
    /// The path could not be handed to the store (interior NUL byte)
    InvalidPath,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    /// Primary SQLite result code, when the failure came from the store.
    pub code: Option<i32>,
    pub message: String,
}

/// The stage of statement processing that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Preparing the statement failed (malformed SQL)
    Syntax,
    /// Immediate execution of a schema or maintenance statement failed
    Exec,
    /// Binding a parameter failed
    Bind,
    /// Stepping a prepared statement failed
    Step,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

#[derive(Debug)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// A field selector does not name a field of the record type
    FieldNotFound,
    /// NULL was read for a field that is not optional
    Mismatch,
    /// The operation needs something the record type does not have
    Invalid,
}

// SQLite primary result codes referenced by the helpers below.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CONSTRAINT: i32 = 19;

impl Error {
    /// Build the error for a NULL read into a non-optional field.
    pub fn null_into_required(expected: &'static str) -> Self {
        Error::Schema(SchemaError {
            kind: SchemaErrorKind::Mismatch,
            message: format!("NULL cannot be decoded into non-optional {}", expected),
        })
    }

    /// Build the error for a selector that names no field of `table`.
    pub fn field_not_found(table: &str, name: &str) -> Self {
        Error::Schema(SchemaError {
            kind: SchemaErrorKind::FieldNotFound,
            message: format!("'{}' is not a field of {}", name, table),
        })
    }

    /// Does this error indicate a bug in the calling program rather than bad data?
    ///
    /// Malformed generated SQL, unknown field selectors and NULL in a
    /// non-optional column all fall in this category.
    pub fn is_programmer_error(&self) -> bool {
        match self {
            Error::Query(q) => q.kind == QueryErrorKind::Syntax,
            Error::Schema(_) => true,
            _ => false,
        }
    }

    /// Is this a transient lock conflict that the caller may retry?
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Query(q) => matches!(q.code, Some(SQLITE_BUSY | SQLITE_LOCKED)),
            _ => false,
        }
    }

    /// Get the SQL that caused this error, if available
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sql.as_deref(),
            _ => None,
        }
    }

    /// Attach a column name to decode failures that do not carry one yet.
    pub fn with_column(self, column: &str) -> Self {
        match self {
            Error::Type(mut e) => {
                if e.column.is_none() {
                    e.column = Some(column.to_string());
                }
                Error::Type(e)
            }
            Error::Schema(SchemaError {
                kind: SchemaErrorKind::Mismatch,
                message,
            }) => Error::Schema(SchemaError {
                kind: SchemaErrorKind::Mismatch,
                message: format!("column '{}': {}", column, message),
            }),
            other => other,
        }
    }
}

impl QueryError {
    /// Is this a constraint violation (unique, primary key, NOT NULL, ...)?
    pub fn is_constraint_violation(&self) -> bool {
        self.code == Some(SQLITE_CONSTRAINT)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e),
            Error::Query(e) => write!(f, "Query error: {}", e),
            Error::Type(e) => write!(f, "Type error: {}", e),
            Error::Schema(e) => write!(f, "Schema error: {}", e.message),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.path)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.kind {
            QueryErrorKind::Syntax => "prepare",
            QueryErrorKind::Exec => "exec",
            QueryErrorKind::Bind => "bind",
            QueryErrorKind::Step => "step",
        };
        write!(f, "{} failed: {}", stage, self.message)?;
        if let Some(sql) = &self.sql {
            write!(f, " [{}]", sql)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = &self.column {
            write!(
                f,
                "expected {} for column '{}', found {}",
                self.expected, col, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}

/// Result type alias for rowmap operations.
pub type Result<T> = std::result::Result<T, Error>;
