//! SQL text builders for SELECT, INSERT, UPDATE, DELETE and upsert.
//!
//! Every builder returns the statement text together with the values to bind,
//! in placeholder order. Building never fails except for an upsert on a
//! record type without a row identifier.

use crate::clause::{OrderBy, Where};
use rowmap_core::error::{SchemaError, SchemaErrorKind};
use rowmap_core::{Error, Model, Result, Value, quote_ident};
use std::marker::PhantomData;

/// Quoted column names in declaration order.
fn column_list<M: Model>(skip_row_id: bool) -> Vec<String> {
    let skip = usize::from(skip_row_id && M::HAS_ROW_ID);
    M::fields()
        .iter()
        .skip(skip)
        .map(|f| quote_ident(f.column_name))
        .collect()
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// SELECT query builder.
#[derive(Debug)]
pub struct SelectBuilder<'a, M: Model> {
    filter: &'a Where<M>,
    order: &'a OrderBy<M>,
}

impl<'a, M: Model> SelectBuilder<'a, M> {
    pub fn new(filter: &'a Where<M>, order: &'a OrderBy<M>) -> Self {
        Self { filter, order }
    }

    /// `SELECT <cols> FROM <t>[ WHERE ...][ ORDER BY ...];`
    pub fn build(&self) -> (String, Vec<Value>) {
        let sql = format!(
            "SELECT {} FROM {}{}{};",
            column_list::<M>(false).join(", "),
            quote_ident(M::TABLE_NAME),
            self.filter.to_sql(),
            self.order.to_sql()
        );
        (sql, self.filter.values())
    }
}

/// INSERT statement shape.
///
/// One shape lists every column; the other leaves out the row identifier so
/// the store assigns one. A record with a zero [`RowId`](rowmap_core::RowId)
/// uses the second.
pub struct InsertBuilder<M: Model> {
    include_row_id: bool,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> InsertBuilder<M> {
    /// Insert every column.
    pub fn new() -> Self {
        Self {
            include_row_id: true,
            _marker: PhantomData,
        }
    }

    /// Insert every column except the row identifier.
    pub fn without_row_id() -> Self {
        Self {
            include_row_id: false,
            _marker: PhantomData,
        }
    }

    /// The shape a given record needs.
    pub fn for_record(record: &M) -> Self {
        match record.row_id() {
            Some(id) if id.is_zero() => Self::without_row_id(),
            _ => Self::new(),
        }
    }

    /// Does this shape bind the row identifier column?
    pub fn includes_row_id(&self) -> bool {
        self.include_row_id || !M::HAS_ROW_ID
    }

    /// `INSERT INTO <t> (<cols>) VALUES (?, ...);`
    pub fn sql(&self) -> String {
        let columns = column_list::<M>(!self.include_row_id);
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            quote_ident(M::TABLE_NAME),
            columns.join(", "),
            placeholders(columns.len())
        )
    }

    /// The record's values for this shape.
    pub fn values(&self, record: &M) -> Vec<Value> {
        let mut values = record.to_values();
        if !self.include_row_id && M::HAS_ROW_ID {
            values.remove(0);
        }
        values
    }

    pub fn build(&self, record: &M) -> (String, Vec<Value>) {
        (self.sql(), self.values(record))
    }
}

impl<M: Model> Default for InsertBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for InsertBuilder<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Model> Copy for InsertBuilder<M> {}

impl<M: Model> std::fmt::Debug for InsertBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsertBuilder")
            .field("table", &M::TABLE_NAME)
            .field("include_row_id", &self.include_row_id)
            .finish()
    }
}

/// UPDATE query builder.
///
/// Sets every column, row identifier included, from one record.
#[derive(Debug)]
pub struct UpdateBuilder<'a, M: Model> {
    record: &'a M,
    filter: &'a Where<M>,
}

impl<'a, M: Model> UpdateBuilder<'a, M> {
    pub fn new(record: &'a M, filter: &'a Where<M>) -> Self {
        Self { record, filter }
    }

    /// `UPDATE <t> SET c1 = ?, ...[ WHERE ...];`
    pub fn build(&self) -> (String, Vec<Value>) {
        let assignments: Vec<String> = column_list::<M>(false)
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect();
        let sql = format!(
            "UPDATE {} SET {}{};",
            quote_ident(M::TABLE_NAME),
            assignments.join(", "),
            self.filter.to_sql()
        );
        let mut params = self.record.to_values();
        params.extend(self.filter.values());
        (sql, params)
    }
}

/// DELETE query builder.
#[derive(Debug)]
pub struct DeleteBuilder<'a, M: Model> {
    filter: &'a Where<M>,
}

impl<'a, M: Model> DeleteBuilder<'a, M> {
    pub fn new(filter: &'a Where<M>) -> Self {
        Self { filter }
    }

    /// `DELETE FROM <t>[ WHERE ...];`
    pub fn build(&self) -> (String, Vec<Value>) {
        let sql = format!(
            "DELETE FROM {}{};",
            quote_ident(M::TABLE_NAME),
            self.filter.to_sql()
        );
        (sql, self.filter.values())
    }
}

/// Insert-or-update keyed on the row identifier.
///
/// A non-empty filter guards the update: an existing row that does not match
/// it is left untouched.
#[derive(Debug)]
pub struct UpsertBuilder<'a, M: Model> {
    record: &'a M,
    filter: &'a Where<M>,
}

impl<'a, M: Model> UpsertBuilder<'a, M> {
    pub fn new(record: &'a M, filter: &'a Where<M>) -> Self {
        Self { record, filter }
    }

    /// `INSERT INTO <t> (...) VALUES (...) ON CONFLICT(<id>) DO UPDATE SET c = excluded.c, ...[ WHERE ...];`
    ///
    /// A zero row identifier is left out, so the record is always inserted.
    /// Bindings are the inserted values followed by the filter's literals.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        let Some(id_field) = M::row_id_field() else {
            return Err(Error::Schema(SchemaError {
                kind: SchemaErrorKind::Invalid,
                message: format!("upsert requires a RowId field on {}", M::TABLE_NAME),
            }));
        };

        let insert = InsertBuilder::for_record(self.record);
        let (insert_sql, mut values) = insert.build(self.record);
        let insert_sql = insert_sql.trim_end_matches(';');

        let updates: Vec<String> = column_list::<M>(true)
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect();
        let action = if updates.is_empty() {
            // Nothing to overwrite, so there is nothing to guard either.
            "DO NOTHING".to_string()
        } else {
            values.extend(self.filter.values());
            format!("DO UPDATE SET {}{}", updates.join(", "), self.filter.to_sql())
        };

        let sql = format!(
            "{} ON CONFLICT({}) {};",
            insert_sql,
            quote_ident(id_field.column_name),
            action
        );
        Ok((sql, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_models::{Account, Reading, Slot};
    use rowmap_core::RowId;

    fn account(id: i64) -> Account {
        Account {
            id: RowId::new(id),
            balance: 12.5,
            owner: "ada".to_string(),
            note: None,
        }
    }

    #[test]
    fn test_select_plain() {
        let (sql, params) = SelectBuilder::<Account>::new(&Where::new(), &OrderBy::new()).build();
        assert_eq!(
            sql,
            r#"SELECT "id", "balance", "owner", "note" FROM "accounts";"#
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_with_clauses() {
        let filter = Where::new().eq(Account::OWNER, "ada").ge(Account::BALANCE, 1.0);
        let order = OrderBy::new().desc(Account::BALANCE);
        let (sql, params) = SelectBuilder::new(&filter, &order).build();
        assert_eq!(
            sql,
            r#"SELECT "id", "balance", "owner", "note" FROM "accounts" WHERE "owner" = ? AND "balance" >= ? ORDER BY "balance" DESC;"#
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_keyword_names_are_quoted() {
        let filter = Where::new().gt(Slot::ORDER, 2);
        let order = OrderBy::new().asc(Slot::GROUP);
        let (sql, _) = SelectBuilder::new(&filter, &order).build();
        assert_eq!(
            sql,
            r#"SELECT "order", "group" FROM "index" WHERE "order" > ? ORDER BY "group" ASC;"#
        );

        let slot = Slot {
            order: 1,
            group: "a".to_string(),
        };
        let (sql, _) = InsertBuilder::for_record(&slot).build(&slot);
        assert_eq!(sql, r#"INSERT INTO "index" ("order", "group") VALUES (?, ?);"#);

        let (sql, _) = UpdateBuilder::new(&slot, &Where::new()).build();
        assert_eq!(sql, r#"UPDATE "index" SET "order" = ?, "group" = ?;"#);

        let (sql, _) = DeleteBuilder::<Slot>::new(&Where::new()).build();
        assert_eq!(sql, r#"DELETE FROM "index";"#);
    }

    #[test]
    fn test_insert_shapes() {
        let (sql, params) = InsertBuilder::for_record(&account(7)).build(&account(7));
        assert_eq!(
            sql,
            r#"INSERT INTO "accounts" ("id", "balance", "owner", "note") VALUES (?, ?, ?, ?);"#
        );
        assert_eq!(params[0], Value::Integer(7));

        let fresh = account(0);
        let shape = InsertBuilder::for_record(&fresh);
        assert!(!shape.includes_row_id());
        let (sql, params) = shape.build(&fresh);
        assert_eq!(
            sql,
            r#"INSERT INTO "accounts" ("balance", "owner", "note") VALUES (?, ?, ?);"#
        );
        assert_eq!(
            params,
            vec![Value::Double(12.5), Value::Text("ada".into()), Value::Null]
        );
    }

    #[test]
    fn test_insert_without_row_id_type() {
        let reading = Reading {
            sensor: "porch".to_string(),
            celsius: -3.0,
        };
        let shape = InsertBuilder::<Reading>::without_row_id();
        assert!(shape.includes_row_id());
        let (sql, params) = shape.build(&reading);
        assert_eq!(
            sql,
            r#"INSERT INTO "reading" ("sensor", "celsius") VALUES (?, ?);"#
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_update_binds_record_then_filter() {
        let record = account(3);
        let filter = Where::new().eq(Account::ID, RowId::new(3));
        let (sql, params) = UpdateBuilder::new(&record, &filter).build();
        assert_eq!(
            sql,
            r#"UPDATE "accounts" SET "id" = ?, "balance" = ?, "owner" = ?, "note" = ? WHERE "id" = ?;"#
        );
        assert_eq!(params.len(), 5);
        assert_eq!(params[4], Value::Integer(3));
    }

    #[test]
    fn test_delete() {
        let (sql, params) = DeleteBuilder::<Account>::new(&Where::new()).build();
        assert_eq!(sql, r#"DELETE FROM "accounts";"#);
        assert!(params.is_empty());

        let filter = Where::new().is_null(Account::NOTE);
        let (sql, params) = DeleteBuilder::new(&filter).build();
        assert_eq!(sql, r#"DELETE FROM "accounts" WHERE "note" IS ?;"#);
        assert_eq!(params, vec![Value::Null]);
    }

    #[test]
    fn test_upsert() {
        let record = account(9);
        let (sql, params) = UpsertBuilder::new(&record, &Where::new()).build().unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "accounts" ("id", "balance", "owner", "note") VALUES (?, ?, ?, ?) ON CONFLICT("id") DO UPDATE SET "balance" = excluded."balance", "owner" = excluded."owner", "note" = excluded."note";"#
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_upsert_guard_binds_after_values() {
        let record = account(9);
        let guard = Where::new().lt(Account::BALANCE, 100.0);
        let (sql, params) = UpsertBuilder::new(&record, &guard).build().unwrap();
        assert!(sql.ends_with(r#"excluded."note" WHERE "balance" < ?;"#));
        assert_eq!(params.len(), 5);
        assert_eq!(params[4], Value::Double(100.0));
    }

    #[test]
    fn test_upsert_requires_row_id() {
        let reading = Reading {
            sensor: "attic".to_string(),
            celsius: 30.0,
        };
        let err = UpsertBuilder::new(&reading, &Where::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(ref e) if e.kind == SchemaErrorKind::Invalid
        ));
    }
}
