//! CREATE TABLE statement builder.

use rowmap_core::{FieldInfo, Model, quote_ident};
use std::marker::PhantomData;

/// Builder for CREATE TABLE statements.
///
/// One line per field, in declaration order. The row identifier column is
/// `PRIMARY KEY`; every other non-optional column is `NOT NULL`.
pub struct CreateTable<M: Model> {
    if_not_exists: bool,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> CreateTable<M> {
    pub fn new() -> Self {
        Self {
            if_not_exists: false,
            _marker: PhantomData,
        }
    }

    /// Add IF NOT EXISTS clause.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Build the CREATE TABLE SQL.
    pub fn build(&self) -> String {
        let mut sql = String::from("CREATE TABLE ");

        if self.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }

        sql.push_str(&quote_ident(M::TABLE_NAME));
        sql.push_str(" (\n");

        let column_defs: Vec<String> = M::fields().iter().map(column_definition).collect();
        sql.push_str(&column_defs.join(",\n"));
        sql.push_str("\n);");

        sql
    }
}

fn column_definition(field: &FieldInfo) -> String {
    let mut def = format!(
        "    {} {}",
        quote_ident(field.column_name),
        field.sql_type.sql_name()
    );

    if field.primary_key {
        def.push_str(" PRIMARY KEY");
    } else if !field.nullable {
        def.push_str(" NOT NULL");
    }

    def
}

impl<M: Model> Default for CreateTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> std::fmt::Debug for CreateTable<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateTable")
            .field("table", &M::TABLE_NAME)
            .field("if_not_exists", &self.if_not_exists)
            .finish()
    }
}
