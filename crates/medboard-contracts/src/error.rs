//! Error types for the MEDBOARD dashboard core.
//!
//! All fallible operations return `DashResult<T>`. Most failures are
//! absorbed by the orchestrator (fail-soft); the variants still carry enough
//! context to produce a useful log line at the point they are absorbed.

use thiserror::Error;

/// The unified error type for the MEDBOARD crates.
#[derive(Debug, Error)]
pub enum DashError {
    /// A point-in-time query could not be served (store unreachable or
    /// filter rejected).
    #[error("query on '{table}' failed: {reason}")]
    QueryFailed { table: String, reason: String },

    /// An update-by-id request was rejected by the store.
    #[error("update of '{table}/{id}' failed: {reason}")]
    UpdateFailed {
        table: String,
        id: String,
        reason: String,
    },

    /// The store refused to open an insert subscription.
    #[error("subscription to '{table}' failed: {reason}")]
    SubscribeFailed { table: String, reason: String },

    /// A row could not be decoded into a typed record.
    #[error("malformed row in '{table}': {reason}")]
    MalformedRow { table: String, reason: String },

    /// The session does not grant access to the dashboard.
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the MEDBOARD crates.
pub type DashResult<T> = Result<T, DashError>;
