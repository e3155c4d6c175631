//! Timestamp resolution for month/year bucketing.
//!
//! Rows carry `created_at` as text. The `Calendar` turns that text into a
//! local date-time in a fixed display offset so that "month of" and
//! "year of" are well defined and deterministic.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Outcome of resolving a raw `created_at` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// No timestamp was stored.
    Absent,
    /// A timestamp was stored but could not be parsed.
    Malformed,
    /// The timestamp in the calendar's local offset.
    At(DateTime<FixedOffset>),
}

impl Stamp {
    /// Local calendar month, 0-based (January = 0).
    pub fn month0(&self) -> Option<usize> {
        match self {
            Stamp::At(dt) => Some(dt.month0() as usize),
            _ => None,
        }
    }

    /// Local calendar year.
    pub fn year(&self) -> Option<i32> {
        match self {
            Stamp::At(dt) => Some(dt.year()),
            _ => None,
        }
    }
}

/// Resolves stored timestamps into a fixed local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

/// Offset-bearing layouts, tried after RFC 3339.
const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Layouts without an offset; interpreted in the calendar's own offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Calendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// A calendar whose local zone is UTC.
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Build a calendar from an offset in minutes east of UTC.
    ///
    /// Returns `None` when the offset is a day or more.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Resolve a raw `created_at` value.
    pub fn resolve(&self, raw: Option<&str>) -> Stamp {
        let Some(raw) = raw.map(str::trim) else {
            return Stamp::Absent;
        };
        if raw.is_empty() {
            return Stamp::Absent;
        }
        match self.parse(raw) {
            Some(dt) => Stamp::At(dt),
            None => Stamp::Malformed,
        }
    }

    /// The local calendar year at `now`.
    pub fn year_of(&self, now: DateTime<Utc>) -> i32 {
        now.with_timezone(&self.offset).year()
    }

    fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&self.offset));
        }
        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Some(dt.with_timezone(&self.offset));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return self.offset.from_local_datetime(&naive).single();
            }
        }
        // Bare dates are taken as UTC midnight.
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        let midnight = date.and_hms_opt(0, 0, 0)?;
        Some(midnight.and_utc().with_timezone(&self.offset))
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}
