//! Row-store vocabulary.
//!
//! The persistence layer is generic: rows are JSON objects reachable by
//! table name, filtered by column equality and optionally ordered by one
//! column. Typed records are decoded from rows at the edge of the core.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DashError, DashResult};

/// Primary-key column present on every table.
pub const ID_COLUMN: &str = "id";

/// Column linking patients and notifications to their doctor.
pub const OWNER_COLUMN: &str = "doctor_id";

pub const CREATED_AT_COLUMN: &str = "created_at";

pub const IS_READ_COLUMN: &str = "is_read";

/// One stored row: column name to JSON value.
pub type Row = Map<String, Value>;

/// A partial row applied by an update-by-id request.
pub type Patch = Map<String, Value>;

/// Column-equality filter. Every entry must match for a row to be returned.
pub type Filter = BTreeMap<String, Value>;

/// Sort direction for `OrderBy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering applied to a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// A point-in-time query against one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowQuery {
    pub table: String,
    pub filter: Filter,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl RowQuery {
    /// Start a query that returns every row of `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: Filter::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Require `column == value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(column.into(), value.into());
        self
    }

    /// Order the result by `column`.
    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Decode a row into a typed record.
pub fn decode_row<T: DeserializeOwned>(table: &str, row: Row) -> DashResult<T> {
    serde_json::from_value(Value::Object(row)).map_err(|e| DashError::MalformedRow {
        table: table.to_string(),
        reason: e.to_string(),
    })
}

/// Encode a typed record as a row. Non-object encodings yield an empty row.
pub fn encode_row<T: Serialize>(record: &T) -> Row {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Row::new(),
    }
}
