//! Patient roster types.
//!
//! Patient rows are owned by the persistence layer; the core only reads
//! them. Gender is normalized once, while decoding, into a closed type so
//! the aggregation rules never compare free text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::calendar::{Calendar, Stamp};
use crate::notification::SubjectId;

/// Opaque patient identifier assigned by the row store.
///
/// Numeric ids decode to their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct PatientId(pub String);

impl From<Value> for PatientId {
    fn from(raw: Value) -> Self {
        match raw {
            Value::String(s) => PatientId(s),
            other => PatientId(other.to_string()),
        }
    }
}

/// Decode any JSON value as text: strings as-is, `null` as `None`, and
/// everything else as its JSON rendering.
///
/// A patient row with an odd-typed column still belongs to the roster; the
/// rules that read the column decide what the text means.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Normalized patient gender.
///
/// Decoding is case-insensitive: `"Male"`, `"MALE"` and `"male"` are all
/// `Male`. Any other text, a non-text value, or no value is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Option<String>")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn normalize(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

impl From<Value> for Gender {
    fn from(raw: Value) -> Self {
        match raw {
            Value::String(s) => Gender::normalize(&s),
            _ => Gender::Unknown,
        }
    }
}

impl From<Gender> for Option<String> {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => Some("male".to_string()),
            Gender::Female => Some("female".to_string()),
            Gender::Unknown => None,
        }
    }
}

/// The two conditions the dashboard charts track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Type1Diabetes,
    Type2Diabetes,
}

impl Condition {
    pub const TRACKED: [Condition; 2] = [Condition::Type1Diabetes, Condition::Type2Diabetes];

    /// The exact label stored in patient rows.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Type1Diabetes => "Type 1 Diabetes",
            Condition::Type2Diabetes => "Type 2 Diabetes",
        }
    }

    /// Classify a stored label. Matching is exact and case-sensitive.
    pub fn classify(label: &str) -> Option<Self> {
        Self::TRACKED.into_iter().find(|c| c.label() == label)
    }
}

/// Which genders a per-condition chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderFilter {
    #[default]
    All,
    Male,
    Female,
}

impl GenderFilter {
    /// True if records of `gender` are counted under this filter.
    pub fn admits(&self, gender: Gender) -> bool {
        match (self, gender) {
            (_, Gender::Unknown) => false,
            (GenderFilter::All, _) => true,
            (GenderFilter::Male, Gender::Male) => true,
            (GenderFilter::Female, Gender::Female) => true,
            _ => false,
        }
    }
}

impl std::str::FromStr for GenderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(GenderFilter::All),
            "male" => Ok(GenderFilter::Male),
            "female" => Ok(GenderFilter::Female),
            other => Err(format!("unknown gender filter '{other}' (expected all, male or female)")),
        }
    }
}

/// One row of the patient roster, as the core sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: PatientId,
    /// The doctor this patient is assigned to.
    #[serde(default)]
    pub doctor_id: Option<SubjectId>,
    /// Free-text diagnosis label.
    #[serde(default, deserialize_with = "lenient_text")]
    pub condition: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    /// Raw creation timestamp as stored. Non-text values are kept as their
    /// JSON rendering and resolve to `Stamp::Malformed`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

impl PatientRecord {
    /// True if the stored condition is exactly `condition`'s label.
    pub fn has_condition(&self, condition: Condition) -> bool {
        self.condition.as_deref() == Some(condition.label())
    }

    /// True if the stored condition is one of the tracked labels.
    pub fn is_tracked(&self) -> bool {
        self.condition.as_deref().and_then(Condition::classify).is_some()
    }

    pub fn stamp(&self, calendar: &Calendar) -> Stamp {
        calendar.resolve(self.created_at.as_deref())
    }
}
