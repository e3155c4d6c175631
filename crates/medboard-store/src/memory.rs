//! In-memory implementation of `RowStore`.
//!
//! `InMemoryRowStore` is the reference implementation of the `RowStore`
//! trait. Tables are `Vec<Row>`s behind a `Mutex`, and every insert is
//! pushed synchronously to the sinks subscribed to that table.
//!
//! Failure switches (`fail_queries`, `fail_updates`, `fail_subscriptions`)
//! let tests and the demo exercise the dashboard's fail-soft paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info, warn};

use medboard_contracts::{
    error::{DashError, DashResult},
    row::{Patch, Row, RowQuery, ID_COLUMN},
};
use medboard_core::traits::{InsertSink, RowStore, SubscriptionHandle};

use crate::order::{matches_filter, sort_rows};

// ── Internal mutable state ────────────────────────────────────────────────────

struct Subscriber {
    table: String,
    sink: InsertSink,
}

#[derive(Default)]
pub(crate) struct StoreState {
    /// Rows per table, in insertion order.
    pub(crate) tables: HashMap<String, Vec<Row>>,
    subscribers: HashMap<u64, Subscriber>,
    next_handle: u64,
    fail_queries: bool,
    fail_updates: bool,
    fail_subscriptions: bool,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory row store with insert subscriptions.
///
/// Cloning is cheap and yields a handle to the same tables.
#[derive(Clone, Default)]
pub struct InMemoryRowStore {
    pub(crate) state: Arc<Mutex<StoreState>>,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `row` into `table` and deliver it to the table's subscribers.
    ///
    /// A row without an `id` is assigned a fresh UUID. Returns the row's id.
    pub fn insert(&self, table: &str, mut row: Row) -> String {
        let id = match row.get(ID_COLUMN) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                row.insert(ID_COLUMN.to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut state = self.lock();
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());

        let mut delivered = 0;
        for subscriber in state.subscribers.values().filter(|s| s.table == table) {
            (subscriber.sink)(row.clone());
            delivered += 1;
        }

        debug!(table = %table, id = %id, delivered, "row inserted");
        id
    }

    /// Insert rows without notifying subscribers, as if they predate any
    /// subscription.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        let mut state = self.lock();
        let target = state.tables.entry(table.to_string()).or_default();
        let before = target.len();
        target.extend(rows);
        info!(table = %table, rows = target.len() - before, "table seeded");
    }

    /// Fetch one row by id.
    pub fn get(&self, table: &str, id: &str) -> Option<Row> {
        let state = self.lock();
        state
            .tables
            .get(table)?
            .iter()
            .find(|row| row_id_is(row, id))
            .cloned()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, Vec::len)
    }

    /// Number of open subscriptions on `table`.
    pub fn subscriber_count(&self, table: &str) -> usize {
        self.lock()
            .subscribers
            .values()
            .filter(|s| s.table == table)
            .count()
    }

    /// Make every subsequent `query` fail (or succeed again).
    pub fn fail_queries(&self, fail: bool) {
        self.lock().fail_queries = fail;
    }

    /// Make every subsequent `update` fail (or succeed again).
    pub fn fail_updates(&self, fail: bool) {
        self.lock().fail_updates = fail;
    }

    /// Make every subsequent `subscribe` fail (or succeed again).
    pub fn fail_subscriptions(&self, fail: bool) {
        self.lock().fail_subscriptions = fail;
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // A panic while holding the lock cannot leave rows half-written, so
        // the state is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn row_id_is(row: &Row, id: &str) -> bool {
    match row.get(ID_COLUMN) {
        Some(Value::String(s)) => s == id,
        Some(other) => other.to_string() == id,
        None => false,
    }
}

// ── RowStore impl ─────────────────────────────────────────────────────────────

impl RowStore for InMemoryRowStore {
    fn query(&self, query: &RowQuery) -> DashResult<Vec<Row>> {
        let state = self.lock();
        if state.fail_queries {
            warn!(table = %query.table, "query rejected (failure injected)");
            return Err(DashError::QueryFailed {
                table: query.table.clone(),
                reason: "store unavailable".to_string(),
            });
        }

        let mut rows: Vec<Row> = state
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filter(row, &query.filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order_by {
            sort_rows(&mut rows, order);
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        debug!(table = %query.table, returned = rows.len(), "query served");
        Ok(rows)
    }

    fn update(&self, table: &str, id: &str, patch: &Patch) -> DashResult<()> {
        let mut state = self.lock();
        if state.fail_updates {
            warn!(table = %table, id = %id, "update rejected (failure injected)");
            return Err(DashError::UpdateFailed {
                table: table.to_string(),
                id: id.to_string(),
                reason: "store unavailable".to_string(),
            });
        }

        let row = state
            .tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id_is(row, id)))
            .ok_or_else(|| DashError::UpdateFailed {
                table: table.to_string(),
                id: id.to_string(),
                reason: "no such row".to_string(),
            })?;

        for (column, value) in patch {
            row.insert(column.clone(), value.clone());
        }

        debug!(table = %table, id = %id, columns = patch.len(), "row updated");
        Ok(())
    }

    fn subscribe(&self, table: &str, sink: InsertSink) -> DashResult<SubscriptionHandle> {
        let mut state = self.lock();
        if state.fail_subscriptions {
            warn!(table = %table, "subscription rejected (failure injected)");
            return Err(DashError::SubscribeFailed {
                table: table.to_string(),
                reason: "realtime channel unavailable".to_string(),
            });
        }

        state.next_handle += 1;
        let handle = state.next_handle;
        state.subscribers.insert(
            handle,
            Subscriber {
                table: table.to_string(),
                sink,
            },
        );

        info!(table = %table, handle, "subscription opened");
        Ok(SubscriptionHandle(handle))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut state = self.lock();
        if let Some(subscriber) = state.subscribers.remove(&handle.0) {
            info!(table = %subscriber.table, handle = handle.0, "subscription closed");
        }
    }
}
