//! Chart dataset shapes produced by the aggregation engine.
//!
//! These are plain values. Renderers consume them as-is; the series order
//! and labels are part of the contract.

use serde::{Deserialize, Serialize};

/// Category labels shared by every monthly chart.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Series label for male counts.
pub const MALE_LABEL: &str = "Male";

/// Series label for female counts.
pub const FEMALE_LABEL: &str = "Female";

/// Twelve month buckets, January first.
pub type MonthBuckets = [u32; 12];

/// One labelled series of monthly counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub label: String,
    pub counts: MonthBuckets,
}

impl MonthlySeries {
    pub fn new(label: impl Into<String>, counts: MonthBuckets) -> Self {
        Self {
            label: label.into(),
            counts,
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// The dataset for one chart: one or more series over `MONTH_LABELS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub series: Vec<MonthlySeries>,
}

impl ChartData {
    pub fn labels(&self) -> [&'static str; 12] {
        MONTH_LABELS
    }

    /// Find a series by its exact label.
    pub fn series(&self, label: &str) -> Option<&MonthlySeries> {
        self.series.iter().find(|s| s.label == label)
    }

    /// Sum of every bucket across every series.
    pub fn total(&self) -> u32 {
        self.series.iter().map(MonthlySeries::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
