//! The dashboard orchestrator.
//!
//! Composes the notification reconciler and the aggregation engine for one
//! subject and one set of filter selections:
//!
//!   subject change  →  refetch profile and roster, re-initialize notifications,
//!                      recompute all
//!   gender filter   →  recompute that condition's chart only
//!   year filter     →  recompute the risk overview only
//!
//! The roster is fetched once per subject (never streamed) and replaced
//! wholesale on refetch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use medboard_contracts::{
    calendar::Calendar,
    chart::ChartData,
    doctor::DoctorProfile,
    error::{DashError, DashResult},
    notification::{NotificationId, NotificationView, SubjectId},
    patient::{Condition, GenderFilter, PatientRecord},
    row::{decode_row, Direction, RowQuery, CREATED_AT_COLUMN, ID_COLUMN, OWNER_COLUMN},
    session::Session,
};
use medboard_core::{
    aggregate::{available_years, monthly_counts, risk_overview, year_options},
    MarkRead, NotificationReconciler, RowStore,
};

use crate::config::{DashboardConfig, TableConfig};

/// The three charts on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Type1,
    Type2,
    Risk,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Type1, ChartKind::Type2, ChartKind::Risk];

    /// The per-condition chart for `condition`.
    pub fn for_condition(condition: Condition) -> Self {
        match condition {
            Condition::Type1Diabetes => ChartKind::Type1,
            Condition::Type2Diabetes => ChartKind::Type2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Type1 => "Type 1 Diabetes Overview",
            ChartKind::Type2 => "Type 2 Diabetes Overview",
            ChartKind::Risk => "Monthly Risk Patients Overview",
        }
    }

    fn slot(&self) -> usize {
        match self {
            ChartKind::Type1 => 0,
            ChartKind::Type2 => 1,
            ChartKind::Risk => 2,
        }
    }
}

/// Current filter selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub type1_gender: GenderFilter,
    pub type2_gender: GenderFilter,
    /// Shared year selection; only the risk overview is year-scoped.
    pub year: i32,
}

impl Filters {
    pub fn gender(&self, condition: Condition) -> GenderFilter {
        match condition {
            Condition::Type1Diabetes => self.type1_gender,
            Condition::Type2Diabetes => self.type2_gender,
        }
    }
}

/// Everything the presentation layer renders, as one serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub subject: SubjectId,
    pub profile: DoctorProfile,
    pub greeting: String,
    pub filters: Filters,
    pub year_options: Vec<i32>,
    pub type1: ChartData,
    pub type2: ChartData,
    pub risk: ChartData,
    pub notifications: NotificationView,
}

/// One doctor's dashboard.
pub struct Dashboard {
    store: Arc<dyn RowStore>,
    tables: TableConfig,
    calendar: Calendar,
    current_year: i32,
    subject: SubjectId,
    profile: DoctorProfile,
    roster: Vec<PatientRecord>,
    filters: Filters,
    charts: [ChartData; 3],
    /// Bumped each time a chart is recomputed.
    revisions: [u64; 3],
    years: Vec<i32>,
    notifications: NotificationReconciler,
}

impl Dashboard {
    /// Open the dashboard for `subject`.
    ///
    /// `now` fixes the current year used as the default year selection and
    /// as the substitute year for undated records.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the session is an authenticated doctor;
    /// `ConfigError` if `config` is invalid. Store failures are not errors:
    /// they leave the affected views empty.
    pub fn open(
        store: Arc<dyn RowStore>,
        config: &DashboardConfig,
        session: &Session,
        subject: SubjectId,
        now: DateTime<Utc>,
    ) -> DashResult<Self> {
        if !session.is_doctor() {
            warn!(role = %session.role, authenticated = session.authenticated, "dashboard access refused");
            return Err(DashError::Unauthorized {
                reason: format!(
                    "role '{}' (authenticated: {}) may not open the dashboard",
                    session.role, session.authenticated
                ),
            });
        }
        config.validate()?;
        let calendar = config.calendar()?;
        let current_year = calendar.year_of(now);

        let notifications =
            NotificationReconciler::new(Arc::clone(&store), config.tables.notifications.clone());

        let mut dashboard = Self {
            store,
            tables: config.tables.clone(),
            calendar,
            current_year,
            profile: DoctorProfile::unknown(subject.clone()),
            subject,
            roster: Vec::new(),
            filters: Filters {
                type1_gender: config.filters.type1_gender,
                type2_gender: config.filters.type2_gender,
                year: current_year,
            },
            charts: Default::default(),
            revisions: [0; 3],
            years: Vec::new(),
            notifications,
        };
        dashboard.load_subject();
        Ok(dashboard)
    }

    /// Rebind the dashboard to another subject (account switch).
    ///
    /// The old notification subscription is released before anything for
    /// the new subject is fetched. Filter selections are kept.
    pub fn switch_subject(&mut self, subject: SubjectId) {
        info!(from = %self.subject, to = %subject, "dashboard subject switching");
        self.notifications.teardown();
        self.subject = subject;
        self.load_subject();
    }

    /// Refetch the roster for the current subject and recompute every chart.
    pub fn refresh_roster(&mut self) {
        self.roster = self.fetch_roster();
        self.recompute_all();
    }

    /// Change the gender filter of one condition's chart.
    ///
    /// Only that chart is recomputed. Returns false if the filter was
    /// already selected.
    pub fn set_gender_filter(&mut self, condition: Condition, filter: GenderFilter) -> bool {
        let slot = match condition {
            Condition::Type1Diabetes => &mut self.filters.type1_gender,
            Condition::Type2Diabetes => &mut self.filters.type2_gender,
        };
        if *slot == filter {
            return false;
        }
        *slot = filter;
        self.recompute(ChartKind::for_condition(condition));
        true
    }

    /// Change the selected year. Only the risk overview is recomputed.
    pub fn set_year(&mut self, year: i32) -> bool {
        if self.filters.year == year {
            return false;
        }
        self.filters.year = year;
        self.recompute(ChartKind::Risk);
        true
    }

    /// Apply any notifications the stream has delivered since the last poll.
    pub fn poll_notifications(&mut self) -> usize {
        self.notifications.pump()
    }

    pub fn mark_read(&mut self, id: &NotificationId) -> MarkRead {
        self.notifications.mark_read(id)
    }

    pub fn notifications(&self) -> NotificationView {
        self.notifications.view()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    /// True while the notification stream is open.
    pub fn is_live(&self) -> bool {
        self.notifications.is_live()
    }

    pub fn chart(&self, kind: ChartKind) -> &ChartData {
        &self.charts[kind.slot()]
    }

    /// How many times `kind` has been computed. Renderers can compare
    /// revisions to skip redrawing unchanged charts.
    pub fn chart_revision(&self, kind: ChartKind) -> u64 {
        self.revisions[kind.slot()]
    }

    pub fn filters(&self) -> Filters {
        self.filters
    }

    /// Distinct years in the roster, newest first.
    pub fn available_years(&self) -> &[i32] {
        &self.years
    }

    /// Years the year selector offers.
    pub fn year_options(&self) -> Vec<i32> {
        year_options(&self.years, self.current_year)
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn roster(&self) -> &[PatientRecord] {
        &self.roster
    }

    /// The subject's profile. Fields the doctors table could not supply
    /// are `None` and display with fallbacks.
    pub fn profile(&self) -> &DoctorProfile {
        &self.profile
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            subject: self.subject.clone(),
            profile: self.profile.clone(),
            greeting: self.profile.greeting(),
            filters: self.filters,
            year_options: self.year_options(),
            type1: self.chart(ChartKind::Type1).clone(),
            type2: self.chart(ChartKind::Type2).clone(),
            risk: self.chart(ChartKind::Risk).clone(),
            notifications: self.notifications(),
        }
    }

    /// Release the notification subscription.
    pub fn close(&mut self) {
        self.notifications.teardown();
        info!(subject = %self.subject, "dashboard closed");
    }

    fn load_subject(&mut self) {
        self.profile = self.fetch_profile();
        self.roster = self.fetch_roster();
        self.notifications.initialize(self.subject.clone());
        self.recompute_all();
        info!(
            subject = %self.subject,
            patients = self.roster.len(),
            notifications = self.notifications.records().len(),
            unread = self.notifications.unread_count(),
            "dashboard loaded"
        );
    }

    fn fetch_profile(&self) -> DoctorProfile {
        let query = RowQuery::table(self.tables.doctors.as_str())
            .eq(ID_COLUMN, self.subject.as_str())
            .limit(1);

        let row = match self.store.query(&query) {
            Ok(rows) => rows.into_iter().next(),
            Err(e) => {
                warn!(subject = %self.subject, error = %e, "profile query failed, using fallbacks");
                None
            }
        };

        match row.map(|row| decode_row::<DoctorProfile>(&self.tables.doctors, row)) {
            Some(Ok(profile)) => profile,
            Some(Err(e)) => {
                warn!(subject = %self.subject, error = %e, "profile row skipped");
                DoctorProfile::unknown(self.subject.clone())
            }
            None => DoctorProfile::unknown(self.subject.clone()),
        }
    }

    fn fetch_roster(&self) -> Vec<PatientRecord> {
        let query = RowQuery::table(self.tables.patients.as_str())
            .eq(OWNER_COLUMN, self.subject.as_str())
            .order(CREATED_AT_COLUMN, Direction::Descending);

        let rows = match self.store.query(&query) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(subject = %self.subject, error = %e, "roster query failed, charts will be empty");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| match decode_row::<PatientRecord>(&self.tables.patients, row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "patient row skipped");
                    None
                }
            })
            .collect()
    }

    fn recompute(&mut self, kind: ChartKind) {
        let chart = match kind {
            ChartKind::Type1 => monthly_counts(
                &self.roster,
                Condition::Type1Diabetes,
                self.filters.type1_gender,
                &self.calendar,
            ),
            ChartKind::Type2 => monthly_counts(
                &self.roster,
                Condition::Type2Diabetes,
                self.filters.type2_gender,
                &self.calendar,
            ),
            ChartKind::Risk => risk_overview(&self.roster, self.filters.year, &self.calendar),
        };
        debug!(chart = ?kind, total = chart.total(), "chart recomputed");
        self.charts[kind.slot()] = chart;
        self.revisions[kind.slot()] += 1;
    }

    fn recompute_all(&mut self) {
        self.years = available_years(&self.roster, self.current_year, &self.calendar);
        for kind in ChartKind::ALL {
            self.recompute(kind);
        }
    }
}
