//! Dashboard configuration schema.
//!
//! A `DashboardConfig` is deserialized from TOML. Every section and key is
//! optional; omitted values take the defaults shown below.
//!
//! ```toml
//! [tables]
//! doctors = "doctors"
//! patients = "patients"
//! notifications = "notifications"
//!
//! [calendar]
//! utc_offset_minutes = 0
//!
//! [filters]
//! type1_gender = "all"
//! type2_gender = "all"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use medboard_contracts::{
    calendar::Calendar,
    error::{DashError, DashResult},
    patient::GenderFilter,
};

/// Row-store table names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub doctors: String,
    pub patients: String,
    pub notifications: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            doctors: "doctors".to_string(),
            patients: "patients".to_string(),
            notifications: "notifications".to_string(),
        }
    }
}

/// The display zone used for month and year bucketing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Minutes east of UTC. Must be strictly within one day.
    pub utc_offset_minutes: i32,
}

/// Initial gender filters for the per-condition charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub type1_gender: GenderFilter,
    pub type2_gender: GenderFilter,
}

/// The top-level structure deserialized from a TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub tables: TableConfig,
    pub calendar: CalendarConfig,
    pub filters: FilterConfig,
}

impl DashboardConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `DashError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or fails validation.
    pub fn from_toml_str(s: &str) -> DashResult<Self> {
        let config: DashboardConfig = toml::from_str(s).map_err(|e| DashError::ConfigError {
            reason: format!("failed to parse dashboard TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as dashboard configuration.
    pub fn from_file(path: &Path) -> DashResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| DashError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check table names and the calendar offset.
    pub fn validate(&self) -> DashResult<()> {
        for (key, name) in [
            ("tables.doctors", &self.tables.doctors),
            ("tables.patients", &self.tables.patients),
            ("tables.notifications", &self.tables.notifications),
        ] {
            if name.trim().is_empty() {
                return Err(DashError::ConfigError {
                    reason: format!("{key} must not be empty"),
                });
            }
        }
        self.calendar().map(|_| ())
    }

    /// The calendar described by `[calendar]`.
    pub fn calendar(&self) -> DashResult<Calendar> {
        Calendar::from_offset_minutes(self.calendar.utc_offset_minutes).ok_or_else(|| {
            DashError::ConfigError {
                reason: format!(
                    "calendar.utc_offset_minutes = {} is outside (-1440, 1440)",
                    self.calendar.utc_offset_minutes
                ),
            }
        })
    }
}
