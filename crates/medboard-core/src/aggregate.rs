//! The month-bucketed aggregation engine.
//!
//! Pure functions over a patient roster. Nothing here caches: every call
//! recomputes from the roster it is given.
//!
//! Timestamp policy differs by use:
//! - bucket assignment skips records whose `created_at` is absent or
//!   malformed;
//! - the year selector substitutes the current year for those records so
//!   that no record silently disappears from the selector population.

use std::collections::BTreeSet;

use medboard_contracts::{
    calendar::Calendar,
    chart::{ChartData, MonthBuckets, MonthlySeries, FEMALE_LABEL, MALE_LABEL},
    patient::{Condition, Gender, GenderFilter, PatientRecord},
};

/// Monthly counts of `condition` patients, split by gender.
///
/// Counts mix every year together. Patients with unknown gender are never
/// counted.
///
/// Output series, in order:
/// - `All`    → `["Male", "Female"]`
/// - `Male`   → `["Male"]`
/// - `Female` → `["Female"]`
pub fn monthly_counts(
    roster: &[PatientRecord],
    condition: Condition,
    filter: GenderFilter,
    calendar: &Calendar,
) -> ChartData {
    let mut male: MonthBuckets = [0; 12];
    let mut female: MonthBuckets = [0; 12];

    for record in roster {
        let Some(month) = record.stamp(calendar).month0() else {
            continue;
        };
        if !record.has_condition(condition) || !filter.admits(record.gender) {
            continue;
        }
        match record.gender {
            Gender::Male => male[month] += 1,
            Gender::Female => female[month] += 1,
            Gender::Unknown => {}
        }
    }

    let series = match filter {
        GenderFilter::All => vec![
            MonthlySeries::new(MALE_LABEL, male),
            MonthlySeries::new(FEMALE_LABEL, female),
        ],
        GenderFilter::Male => vec![MonthlySeries::new(MALE_LABEL, male)],
        GenderFilter::Female => vec![MonthlySeries::new(FEMALE_LABEL, female)],
    };
    ChartData { series }
}

/// Label of the risk-overview series for `year`.
pub fn risk_label(year: i32) -> String {
    format!("Risk Patients ({year})")
}

/// Monthly counts of patients with either tracked condition, for one year.
pub fn risk_overview(roster: &[PatientRecord], year: i32, calendar: &Calendar) -> ChartData {
    let mut counts: MonthBuckets = [0; 12];

    for record in roster.iter().filter(|r| r.is_tracked()) {
        let stamp = record.stamp(calendar);
        if let (Some(month), Some(y)) = (stamp.month0(), stamp.year()) {
            if y == year {
                counts[month] += 1;
            }
        }
    }

    ChartData {
        series: vec![MonthlySeries::new(risk_label(year), counts)],
    }
}

/// Distinct local years present in the roster, newest first.
///
/// Absent or malformed timestamps contribute `current_year`.
pub fn available_years(roster: &[PatientRecord], current_year: i32, calendar: &Calendar) -> Vec<i32> {
    let years: BTreeSet<i32> = roster
        .iter()
        .map(|r| r.stamp(calendar).year().unwrap_or(current_year))
        .collect();
    years.into_iter().rev().collect()
}

/// Years offered by the year selector: the available years, or just the
/// current year when there are none.
pub fn year_options(available: &[i32], current_year: i32) -> Vec<i32> {
    if available.is_empty() {
        vec![current_year]
    } else {
        available.to_vec()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
