//! Table DDL for rowmap.
//!
//! Generates the statements `init` and `drop_table` run: CREATE TABLE from a
//! model's reflected columns, DROP TABLE, and the delete-all used to truncate.

pub mod create;

pub use create::CreateTable;

use rowmap_core::{Model, quote_ident};

/// Create a CREATE TABLE builder for a model.
///
/// ```ignore
/// let sql = rowmap_schema::create_table::<User>().if_not_exists().build();
/// ```
pub fn create_table<M: Model>() -> CreateTable<M> {
    CreateTable::new()
}

/// `DROP TABLE [IF EXISTS] <t>;`
pub fn drop_table_sql<M: Model>(if_exists: bool) -> String {
    if if_exists {
        format!("DROP TABLE IF EXISTS {};", quote_ident(M::TABLE_NAME))
    } else {
        format!("DROP TABLE {};", quote_ident(M::TABLE_NAME))
    }
}

/// Remove every row, keeping the table.
pub fn truncate_sql<M: Model>() -> String {
    format!("DELETE FROM {};", quote_ident(M::TABLE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowmap_core::{FieldInfo, Result, Row, RowId, SqlType, Value};

    struct Note;

    impl Model for Note {
        const TABLE_NAME: &'static str = "note";
        const HAS_ROW_ID: bool = false;

        fn fields() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[FieldInfo::new("body", "body", SqlType::Text)];
            FIELDS
        }

        fn to_values(&self) -> Vec<Value> {
            vec![]
        }

        fn from_row(_row: &Row) -> Result<Self> {
            Ok(Note)
        }

        fn row_id(&self) -> Option<RowId> {
            None
        }

        fn set_row_id(&mut self, _id: RowId) {}
    }

    #[test]
    fn test_drop_table_sql() {
        assert_eq!(drop_table_sql::<Note>(true), "DROP TABLE IF EXISTS \"note\";");
        assert_eq!(drop_table_sql::<Note>(false), "DROP TABLE \"note\";");
    }

    #[test]
    fn test_truncate_sql() {
        assert_eq!(truncate_sql::<Note>(), "DELETE FROM \"note\";");
    }

    #[test]
    fn test_create_table_helper() {
        assert_eq!(
            create_table::<Note>().build(),
            "CREATE TABLE \"note\" (\n    \"body\" TEXT NOT NULL\n);"
        );
    }
}
