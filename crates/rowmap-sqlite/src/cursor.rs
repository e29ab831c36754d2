//! Lazy, forward-only cursor over a SELECT.

use crate::statement::{Statement, Step};
use rowmap_core::{Model, Result};
use std::iter::FusedIterator;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    NotStarted,
    InProgress,
    Complete,
}

/// Iterator over the records a SELECT returns.
///
/// Nothing is read from the store until the first `next`. Each `next` steps
/// the statement once and decodes the row. A step or decode error is yielded
/// once, after which the cursor is exhausted; it cannot be restarted.
pub struct RowCursor<'conn, M> {
    stmt: Statement<'conn>,
    state: CursorState,
    _marker: PhantomData<fn() -> M>,
}

impl<'conn, M: Model> RowCursor<'conn, M> {
    pub(crate) fn new(stmt: Statement<'conn>) -> Self {
        Self {
            stmt,
            state: CursorState::NotStarted,
            _marker: PhantomData,
        }
    }

    /// Has the first row been requested yet?
    pub fn is_started(&self) -> bool {
        self.state != CursorState::NotStarted
    }

    pub fn is_complete(&self) -> bool {
        self.state == CursorState::Complete
    }

    /// Read every remaining record, stopping at the first error.
    pub fn read_all(self) -> Result<Vec<M>> {
        self.collect()
    }

    /// Release the statement's read position; later calls yield nothing.
    fn finish(&mut self) {
        self.state = CursorState::Complete;
        self.stmt.reset();
    }
}

impl<M: Model> Iterator for RowCursor<'_, M> {
    type Item = Result<M>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == CursorState::Complete {
            return None;
        }
        self.state = CursorState::InProgress;

        match self.stmt.step() {
            Ok(Step::Row) => match M::from_row(&self.stmt.read_row()) {
                Ok(record) => Some(Ok(record)),
                Err(e) => {
                    self.finish();
                    Some(Err(e))
                }
            },
            Ok(Step::Done) => {
                self.finish();
                None
            }
            Err(e) => {
                self.finish();
                Some(Err(e))
            }
        }
    }
}

impl<M: Model> FusedIterator for RowCursor<'_, M> {}

impl<M> std::fmt::Debug for RowCursor<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowCursor")
            .field("sql", &self.stmt.sql())
            .field("state", &self.state)
            .finish()
    }
}
