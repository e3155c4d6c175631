//! Row ordering and filtering primitives.
//!
//! Ordering rules for one column:
//!   1. missing and null values sort first
//!   2. booleans before numbers before strings
//!   3. numbers compare numerically, strings lexicographically
//!   4. arrays and objects compare equal to each other
//!
//! ISO 8601 timestamps sort correctly under rule 3 when they share a layout,
//! which is how `created_at` is stored.

use std::cmp::Ordering;

use serde_json::Value;

use medboard_contracts::row::{Direction, Filter, OrderBy, Row};

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) | Some(Value::Object(_)) => 4,
    }
}

/// Compare two column values in ascending order.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Sort rows in place. The sort is stable, so rows with equal keys keep
/// their insertion order.
pub fn sort_rows(rows: &mut [Row], order: &OrderBy) {
    rows.sort_by(|a, b| {
        let ord = compare_values(a.get(&order.column), b.get(&order.column));
        match order.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
}

/// True if every filter column is present in `row` with an equal value.
pub fn matches_filter(row: &Row, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(column, expected)| row.get(column) == Some(expected))
}
