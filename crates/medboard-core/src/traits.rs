//! The persistence seam.
//!
//! The dashboard core never touches storage directly. Everything it needs
//! from the outside world goes through `RowStore`:
//!
//! - `query`       — point-in-time read of an ordered row sequence
//! - `update`      — patch one row by id
//! - `subscribe`   — open a stream of newly inserted rows on a table
//! - `unsubscribe` — release that stream
//!
//! Implementations may be backed by a remote database, a socket feed, or
//! the in-memory reference store used by tests and the demo.

use medboard_contracts::{
    error::DashResult,
    row::{Patch, Row, RowQuery},
};

/// Callback receiving each row inserted into a subscribed table.
///
/// A sink is invoked at most once per physical insert. Sinks must not call
/// back into the store that invokes them.
pub type InsertSink = Box<dyn Fn(Row) + Send>;

/// Opaque handle for an open insert subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// A generic row store reachable by table name.
pub trait RowStore: Send + Sync {
    /// Return the rows of `query.table` matching every filter column, in
    /// the requested order, truncated to `query.limit`.
    fn query(&self, query: &RowQuery) -> DashResult<Vec<Row>>;

    /// Merge `patch` into the row of `table` whose `id` column equals `id`.
    fn update(&self, table: &str, id: &str, patch: &Patch) -> DashResult<()>;

    /// Deliver every row subsequently inserted into `table` to `sink` until
    /// the returned handle is passed to `unsubscribe`.
    fn subscribe(&self, table: &str, sink: InsertSink) -> DashResult<SubscriptionHandle>;

    /// Close a subscription. Unknown or already-closed handles are ignored.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}
