//! The identity field type.

use crate::error::Error;
use crate::value::{Value, unexpected};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row identifier of a record.
///
/// A record type holding a `RowId` as its first field gets a pluralized table
/// name and a `PRIMARY KEY` column. [`RowId::ZERO`] means "not assigned yet":
/// inserts leave the column out so SQLite picks the rowid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RowId(i64);

impl RowId {
    /// The unassigned identifier.
    pub const ZERO: RowId = RowId(0);

    pub const fn new(id: i64) -> Self {
        RowId(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        RowId(id)
    }
}

impl From<RowId> for i64 {
    fn from(id: RowId) -> Self {
        id.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RowId> for Value {
    fn from(id: RowId) -> Self {
        Value::Integer(id.0)
    }
}

impl TryFrom<Value> for RowId {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(v) => Ok(RowId(v)),
            other => Err(unexpected("RowId", &other)),
        }
    }
}
