//! # medboard-store
//!
//! In-memory row store for the MEDBOARD runtime.
//!
//! ## Overview
//!
//! [`InMemoryRowStore`] implements [`RowStore`](medboard_core::RowStore):
//! point-in-time queries with column-equality filters, single-column
//! ordering and limits; update-by-id; and insert subscriptions that fire
//! synchronously on every `insert`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use medboard_store::InMemoryRowStore;
//!
//! let store = InMemoryRowStore::new();
//! store.seed("patients", mock_rows);
//! let shared: Arc<dyn RowStore> = Arc::new(store.clone());
//! ```

pub mod memory;
pub mod order;

pub use memory::InMemoryRowStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
