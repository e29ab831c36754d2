//! Record-level operations on a connection.
//!
//! Each verb builds its SQL from the record type's reflected schema,
//! prepares it, binds, and steps. Nothing here opens a transaction: a
//! failure part-way through `insert` leaves earlier rows committed.

use crate::connection::SqliteConnection;
use crate::cursor::RowCursor;
use crate::statement::Statement;
use rowmap_core::{Model, Result, RowId};
use rowmap_query::{
    DeleteBuilder, InsertBuilder, OrderBy, SelectBuilder, UpdateBuilder, UpsertBuilder, Where,
};

impl SqliteConnection {
    /// Create the table for `M` if it does not exist.
    ///
    /// With `truncate`, every existing row is deleted afterwards; the schema
    /// is kept.
    #[tracing::instrument(level = "debug", skip(self), fields(table = M::TABLE_NAME))]
    pub fn init<M: Model>(&self, truncate: bool) -> Result<()> {
        self.execute_raw(&rowmap_schema::create_table::<M>().if_not_exists().build())?;
        if truncate {
            self.execute_raw(&rowmap_schema::truncate_sql::<M>())?;
            tracing::debug!(removed = self.changes(), "truncated");
        }
        Ok(())
    }

    /// Drop the table for `M` if it exists.
    #[tracing::instrument(level = "debug", skip(self), fields(table = M::TABLE_NAME))]
    pub fn drop_table<M: Model>(&self) -> Result<()> {
        self.execute_raw(&rowmap_schema::drop_table_sql::<M>(true))
    }

    /// Start a query. No row is read until the cursor is pulled.
    #[tracing::instrument(level = "debug", skip_all, fields(table = M::TABLE_NAME))]
    pub fn select<M: Model>(&self, filter: &Where<M>, order: &OrderBy<M>) -> Result<RowCursor<'_, M>> {
        let (sql, params) = SelectBuilder::new(filter, order).build();
        let mut stmt = self.prepare(&sql)?;
        stmt.bind_all(&params)?;
        Ok(RowCursor::new(stmt))
    }

    /// Insert records, returning how many were inserted.
    ///
    /// Records with a zero [`RowId`] get one assigned by the store. One
    /// statement is prepared per column shape and reused for every record.
    #[tracing::instrument(level = "debug", skip_all, fields(table = M::TABLE_NAME))]
    pub fn insert<'r, M, I>(&self, records: I) -> Result<usize>
    where
        M: Model + 'r,
        I: IntoIterator<Item = &'r M>,
    {
        let mut with_row_id: Option<Statement<'_>> = None;
        let mut without_row_id: Option<Statement<'_>> = None;
        let mut inserted = 0;

        for record in records {
            let shape = InsertBuilder::for_record(record);
            let slot = if shape.includes_row_id() {
                &mut with_row_id
            } else {
                &mut without_row_id
            };
            if slot.is_none() {
                *slot = Some(self.prepare(&shape.sql())?);
            }
            if let Some(stmt) = slot.as_mut() {
                stmt.execute(&shape.values(record))?;
                inserted += 1;
            }
        }

        tracing::debug!(rows = inserted, "inserted");
        Ok(inserted)
    }

    /// Insert one record and return its row identifier.
    ///
    /// A zero identifier is replaced with the one the store assigned.
    #[tracing::instrument(level = "debug", skip_all, fields(table = M::TABLE_NAME))]
    pub fn insert_one<M: Model>(&self, record: &mut M) -> Result<RowId> {
        let shape = InsertBuilder::for_record(record);
        self.prepare(&shape.sql())?.execute(&shape.values(record))?;

        let id = RowId::new(self.last_insert_rowid());
        if !shape.includes_row_id() {
            record.set_row_id(id);
        }
        Ok(id)
    }

    /// Overwrite every column of the matching rows with `record`'s values.
    ///
    /// Returns the number of rows changed.
    #[tracing::instrument(level = "debug", skip_all, fields(table = M::TABLE_NAME))]
    pub fn update<M: Model>(&self, record: &M, filter: &Where<M>) -> Result<u64> {
        let (sql, params) = UpdateBuilder::new(record, filter).build();
        self.prepare(&sql)?.execute(&params)?;
        let changed = self.changes();
        tracing::debug!(rows = changed, "updated");
        Ok(changed)
    }

    /// Delete the matching rows; an empty filter deletes all of them.
    ///
    /// Returns the number of rows deleted.
    #[tracing::instrument(level = "debug", skip_all, fields(table = M::TABLE_NAME))]
    pub fn delete<M: Model>(&self, filter: &Where<M>) -> Result<u64> {
        let (sql, params) = DeleteBuilder::new(filter).build();
        self.prepare(&sql)?.execute(&params)?;
        let deleted = self.changes();
        tracing::debug!(rows = deleted, "deleted");
        Ok(deleted)
    }

    /// Insert `record`, or update the row that already has its identifier.
    ///
    /// A non-empty `guard` limits the update to existing rows that match it;
    /// a conflicting row that does not match is left as it is. Only for
    /// record types with a [`RowId`]. Returns the record's identifier, the
    /// store-assigned one when it was zero.
    #[tracing::instrument(level = "debug", skip_all, fields(table = M::TABLE_NAME))]
    pub fn upsert<M: Model>(&self, record: &M, guard: &Where<M>) -> Result<RowId> {
        let (sql, params) = UpsertBuilder::new(record, guard).build()?;
        self.prepare(&sql)?.execute(&params)?;
        tracing::debug!(rows = self.changes(), "upserted");

        match record.row_id() {
            Some(id) if !id.is_zero() => Ok(id),
            _ => Ok(RowId::new(self.last_insert_rowid())),
        }
    }
}
