//! WHERE and ORDER BY descriptors.
//!
//! Both descriptors are typed by the record they filter: a `Where<User>`
//! only accepts `Column<User, _>` selectors, and a literal must convert into
//! the selected field's type. Columns are stored by declaration index and
//! rendered through `Model::column_name`.

use rowmap_core::{Column, Model, Result, Value, quote_ident};
use std::fmt;
use std::marker::PhantomData;

/// Comparison operator of one WHERE condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    /// `IS`, the null-safe equality
    Is,
    IsNot,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Cmp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Cmp::Eq => "=",
            Cmp::Is => "IS",
            Cmp::IsNot => "IS NOT",
            Cmp::Lt => "<",
            Cmp::Le => "<=",
            Cmp::Gt => ">",
            Cmp::Ge => ">=",
        }
    }
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// One `column op ?` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereParam {
    pub column: usize,
    pub cmp: Cmp,
    pub value: Value,
}

/// One `column ASC|DESC` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderParam {
    pub column: usize,
    pub direction: OrderDirection,
}

/// WHERE clause: conditions conjoined with `AND`, in call order.
///
/// An empty `Where` matches every row.
pub struct Where<M> {
    params: Vec<WhereParam>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> Where<M> {
    /// A clause with no conditions.
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Add a condition on a typed field selector.
    pub fn filter<V>(mut self, column: Column<M, V>, cmp: Cmp, value: impl Into<V>) -> Self
    where
        V: Into<Value>,
    {
        self.params.push(WhereParam {
            column: column.index(),
            cmp,
            value: value.into().into(),
        });
        self
    }

    pub fn eq<V: Into<Value>>(self, column: Column<M, V>, value: impl Into<V>) -> Self {
        self.filter(column, Cmp::Eq, value)
    }

    pub fn is<V: Into<Value>>(self, column: Column<M, V>, value: impl Into<V>) -> Self {
        self.filter(column, Cmp::Is, value)
    }

    pub fn is_not<V: Into<Value>>(self, column: Column<M, V>, value: impl Into<V>) -> Self {
        self.filter(column, Cmp::IsNot, value)
    }

    pub fn lt<V: Into<Value>>(self, column: Column<M, V>, value: impl Into<V>) -> Self {
        self.filter(column, Cmp::Lt, value)
    }

    pub fn le<V: Into<Value>>(self, column: Column<M, V>, value: impl Into<V>) -> Self {
        self.filter(column, Cmp::Le, value)
    }

    pub fn gt<V: Into<Value>>(self, column: Column<M, V>, value: impl Into<V>) -> Self {
        self.filter(column, Cmp::Gt, value)
    }

    pub fn ge<V: Into<Value>>(self, column: Column<M, V>, value: impl Into<V>) -> Self {
        self.filter(column, Cmp::Ge, value)
    }

    /// `column IS NULL`.
    pub fn is_null<V>(mut self, column: Column<M, Option<V>>) -> Self {
        self.params.push(WhereParam {
            column: column.index(),
            cmp: Cmp::Is,
            value: Value::Null,
        });
        self
    }

    /// `column IS NOT NULL`.
    pub fn is_not_null<V>(mut self, column: Column<M, Option<V>>) -> Self {
        self.params.push(WhereParam {
            column: column.index(),
            cmp: Cmp::IsNot,
            value: Value::Null,
        });
        self
    }

    /// Add a condition on a field named at runtime.
    ///
    /// Accepts the field name or its column name. The literal is not checked
    /// against the field's type.
    pub fn by_name(mut self, name: &str, cmp: Cmp, value: impl Into<Value>) -> Result<Self> {
        let column = M::column_index(name)?;
        self.params.push(WhereParam {
            column,
            cmp,
            value: value.into(),
        });
        Ok(self)
    }

    pub fn params(&self) -> &[WhereParam] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render ` WHERE "a" = ? AND "b" IS ?`, or an empty string without conditions.
    pub fn to_sql(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let conditions: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{} {} ?", quote_ident(M::column_name(p.column)), p.cmp))
            .collect();
        format!(" WHERE {}", conditions.join(" AND "))
    }

    /// Literals to bind, in placeholder order.
    pub fn values(&self) -> Vec<Value> {
        self.params.iter().map(|p| p.value.clone()).collect()
    }
}

impl<M: Model> Default for Where<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Where<M> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Where<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Where").field("params", &self.params).finish()
    }
}

/// ORDER BY clause: terms emitted in call order.
pub struct OrderBy<M> {
    params: Vec<OrderParam>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> OrderBy<M> {
    /// No ordering; rows come back in store order.
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn then<V>(mut self, column: Column<M, V>, direction: OrderDirection) -> Self {
        self.params.push(OrderParam {
            column: column.index(),
            direction,
        });
        self
    }

    pub fn asc<V>(self, column: Column<M, V>) -> Self {
        self.then(column, OrderDirection::Asc)
    }

    pub fn desc<V>(self, column: Column<M, V>) -> Self {
        self.then(column, OrderDirection::Desc)
    }

    /// Order by a field named at runtime.
    pub fn by_name(mut self, name: &str, direction: OrderDirection) -> Result<Self> {
        let column = M::column_index(name)?;
        self.params.push(OrderParam { column, direction });
        Ok(self)
    }

    pub fn params(&self) -> &[OrderParam] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render ` ORDER BY "a" ASC, "b" DESC`, or an empty string without terms.
    pub fn to_sql(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                format!(
                    "{} {}",
                    quote_ident(M::column_name(p.column)),
                    p.direction.as_str()
                )
            })
            .collect();
        format!(" ORDER BY {}", terms.join(", "))
    }
}

impl<M: Model> Default for OrderBy<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for OrderBy<M> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M> fmt::Debug for OrderBy<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy").field("params", &self.params).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_models::Account;
    use rowmap_core::{Error, RowId};
    use rowmap_core::error::SchemaErrorKind;

    #[test]
    fn test_empty_clauses_render_nothing() {
        assert_eq!(Where::<Account>::new().to_sql(), "");
        assert_eq!(OrderBy::<Account>::new().to_sql(), "");
    }

    #[test]
    fn test_where_conjunction_in_call_order() {
        let filter = Where::new()
            .gt(Account::BALANCE, 10.5)
            .eq(Account::OWNER, "ada")
            .is(Account::NOTE, None::<String>);
        assert_eq!(
            filter.to_sql(),
            r#" WHERE "balance" > ? AND "owner" = ? AND "note" IS ?"#
        );
        assert_eq!(
            filter.values(),
            vec![Value::Double(10.5), Value::Text("ada".into()), Value::Null]
        );
    }

    #[test]
    fn test_every_operator() {
        let ops = [
            (Cmp::Eq, "="),
            (Cmp::Is, "IS"),
            (Cmp::IsNot, "IS NOT"),
            (Cmp::Lt, "<"),
            (Cmp::Le, "<="),
            (Cmp::Gt, ">"),
            (Cmp::Ge, ">="),
        ];
        for (cmp, text) in ops {
            let filter = Where::new().filter(Account::ID, cmp, RowId::new(3));
            assert_eq!(filter.to_sql(), format!(r#" WHERE "id" {} ?"#, text));
        }
    }

    #[test]
    fn test_null_helpers() {
        let filter = Where::new().is_not_null(Account::NOTE);
        assert_eq!(filter.to_sql(), r#" WHERE "note" IS NOT ?"#);
        assert_eq!(filter.values(), vec![Value::Null]);
    }

    #[test]
    fn test_order_by() {
        let order = OrderBy::new().desc(Account::BALANCE).asc(Account::OWNER);
        assert_eq!(order.to_sql(), r#" ORDER BY "balance" DESC, "owner" ASC"#);
    }

    #[test]
    fn test_by_name() {
        let filter = Where::<Account>::new()
            .by_name("owner", Cmp::Eq, "grace")
            .unwrap();
        assert_eq!(filter.params()[0].column, 2);

        let order = OrderBy::<Account>::new()
            .by_name("balance", OrderDirection::Desc)
            .unwrap();
        assert_eq!(order.to_sql(), r#" ORDER BY "balance" DESC"#);
    }

    #[test]
    fn test_by_name_unknown_field() {
        let err = Where::<Account>::new()
            .by_name("missing", Cmp::Eq, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(ref e) if e.kind == SchemaErrorKind::FieldNotFound
        ));

        assert!(
            OrderBy::<Account>::new()
                .by_name("missing", OrderDirection::Asc)
                .is_err()
        );
    }
}
