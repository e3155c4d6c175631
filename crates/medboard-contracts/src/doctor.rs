//! The signed-in doctor's profile, as shown in the dashboard header.

use serde::{Deserialize, Serialize};

use crate::notification::SubjectId;

/// Shown when the profile has no usable name.
pub const FALLBACK_NAME: &str = "Doctor";

/// Shown when the profile has no usable specialization.
pub const FALLBACK_SPECIALIZATION: &str = "Specialization";

/// One row of the doctors table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: SubjectId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl DoctorProfile {
    /// A profile with nothing known beyond the id.
    pub fn unknown(id: SubjectId) -> Self {
        Self {
            id,
            full_name: None,
            specialization: None,
        }
    }

    /// The name to display; empty names fall back to `FALLBACK_NAME`.
    pub fn display_name(&self) -> &str {
        non_empty(self.full_name.as_deref()).unwrap_or(FALLBACK_NAME)
    }

    pub fn display_specialization(&self) -> &str {
        non_empty(self.specialization.as_deref()).unwrap_or(FALLBACK_SPECIALIZATION)
    }

    /// Header line, e.g. `Welcome Doctor, Elena Ramirez (Endocrinology)`.
    pub fn greeting(&self) -> String {
        format!(
            "Welcome Doctor, {} ({})",
            self.display_name(),
            self.display_specialization()
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
