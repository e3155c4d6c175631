//! # medboard-core
//!
//! The stateful and algorithmic heart of the MEDBOARD dashboard.
//!
//! This crate provides:
//! - The `RowStore` trait, the only seam to the persistence layer
//! - `NotificationReconciler`, which merges a notification snapshot with a
//!   live insert stream and local mark-read acknowledgements
//! - The `aggregate` functions that turn a patient roster into monthly
//!   chart datasets
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medboard_core::{aggregate, NotificationReconciler};
//!
//! let mut notifications = NotificationReconciler::new(store.clone(), "notifications");
//! notifications.initialize(subject);
//! let type1 = aggregate::monthly_counts(&roster, Condition::Type1Diabetes, GenderFilter::All, &calendar);
//! ```

pub mod aggregate;
pub mod reconciler;
pub mod traits;

pub use reconciler::{MarkRead, NotificationReconciler};
pub use traits::{InsertSink, RowStore, SubscriptionHandle};
