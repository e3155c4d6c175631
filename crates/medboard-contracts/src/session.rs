//! Session boundary.
//!
//! Authentication happens elsewhere. The dashboard receives the resulting
//! flag and role and trusts them as given.

use serde::{Deserialize, Serialize};

/// The only role allowed onto the dashboard.
pub const DOCTOR_ROLE: &str = "doctor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub role: String,
}

impl Session {
    pub fn doctor() -> Self {
        Self {
            authenticated: true,
            role: DOCTOR_ROLE.to_string(),
        }
    }

    pub fn is_doctor(&self) -> bool {
        self.authenticated && self.role == DOCTOR_ROLE
    }
}
