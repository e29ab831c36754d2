//! Hand-written models for unit tests (the derive lives in another crate).

use rowmap_core::{Column, FieldInfo, Model, Result, Row, RowId, SqlType, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: RowId,
    pub balance: f64,
    pub owner: String,
    pub note: Option<String>,
}

impl Account {
    pub const ID: Column<Account, RowId> = Column::new(0, "id");
    pub const BALANCE: Column<Account, f64> = Column::new(1, "balance");
    pub const OWNER: Column<Account, String> = Column::new(2, "owner");
    pub const NOTE: Column<Account, Option<String>> = Column::new(3, "note");
}

impl Model for Account {
    const TABLE_NAME: &'static str = "accounts";
    const HAS_ROW_ID: bool = true;

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id", "id", SqlType::Integer).primary_key(true),
            FieldInfo::new("balance", "balance", SqlType::Real),
            FieldInfo::new("owner", "owner", SqlType::Text),
            FieldInfo::new("note", "note", SqlType::Text).nullable(true),
        ];
        FIELDS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id),
            Value::from(self.balance),
            Value::from(self.owner.clone()),
            Value::from(self.note.clone()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_as(0)?,
            balance: row.get_as(1)?,
            owner: row.get_as(2)?,
            note: row.get_as(3)?,
        })
    }

    fn row_id(&self) -> Option<RowId> {
        Some(self.id)
    }

    fn set_row_id(&mut self, id: RowId) {
        self.id = id;
    }
}

/// A record without a row identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor: String,
    pub celsius: f64,
}

impl Reading {
    pub const SENSOR: Column<Reading, String> = Column::new(0, "sensor");
    pub const CELSIUS: Column<Reading, f64> = Column::new(1, "celsius");
}

impl Model for Reading {
    const TABLE_NAME: &'static str = "reading";
    const HAS_ROW_ID: bool = false;

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("sensor", "sensor", SqlType::Text),
            FieldInfo::new("celsius", "celsius", SqlType::Real),
        ];
        FIELDS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![Value::from(self.sensor.clone()), Value::from(self.celsius)]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            sensor: row.get_as(0)?,
            celsius: row.get_as(1)?,
        })
    }

    fn row_id(&self) -> Option<RowId> {
        None
    }

    fn set_row_id(&mut self, _id: RowId) {}
}

/// Table and column names that are SQL keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub order: i64,
    pub group: String,
}

impl Slot {
    pub const ORDER: Column<Slot, i64> = Column::new(0, "order");
    pub const GROUP: Column<Slot, String> = Column::new(1, "group");
}

impl Model for Slot {
    const TABLE_NAME: &'static str = "index";
    const HAS_ROW_ID: bool = false;

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("order", "order", SqlType::Integer),
            FieldInfo::new("group", "group", SqlType::Text),
        ];
        FIELDS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![Value::from(self.order), Value::from(self.group.clone())]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            order: row.get_as(0)?,
            group: row.get_as(1)?,
        })
    }

    fn row_id(&self) -> Option<RowId> {
        None
    }

    fn set_row_id(&mut self, _id: RowId) {}
}
