//! Notification types.
//!
//! A notification belongs to exactly one subject (the doctor it was sent
//! to). Records are immutable apart from `is_read`, which only ever moves
//! from false to true.

use serde::{Deserialize, Serialize};

/// Identifier of the signed-in doctor whose dashboard is in view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque notification identifier assigned by the row store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One notification row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    /// The doctor this notification belongs to. Stored as `doctor_id`.
    #[serde(rename = "doctor_id")]
    pub subject_id: SubjectId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    /// Raw creation timestamp as stored.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The reconciled notification list for one subject.
///
/// `records` is newest first. `unread_count` always equals the number of
/// records with `is_read == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationView {
    pub records: Vec<NotificationRecord>,
    pub unread_count: usize,
}

impl NotificationView {
    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}
