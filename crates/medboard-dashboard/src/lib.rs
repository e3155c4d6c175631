//! # medboard-dashboard
//!
//! The dashboard orchestrator for one signed-in doctor.
//!
//! ## Overview
//!
//! [`Dashboard`] composes the notification reconciler and the aggregation
//! engine from `medboard-core` against an explicit subject and the current
//! filter selections, and exposes three chart datasets plus the
//! notification view to the presentation layer.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medboard_dashboard::{Dashboard, DashboardConfig};
//!
//! let config = DashboardConfig::from_file(Path::new("medboard.toml"))?;
//! let mut dashboard = Dashboard::open(store, &config, &session, subject, Utc::now())?;
//! dashboard.set_gender_filter(Condition::Type1Diabetes, GenderFilter::Female);
//! dashboard.poll_notifications();
//! ```

pub mod config;
pub mod mock_data;
pub mod orchestrator;

pub use config::{CalendarConfig, DashboardConfig, FilterConfig, TableConfig};
pub use orchestrator::{ChartKind, Dashboard, DashboardSnapshot, Filters};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};

    use medboard_contracts::{
        chart::{FEMALE_LABEL, MALE_LABEL},
        doctor::{FALLBACK_NAME, FALLBACK_SPECIALIZATION},
        error::DashError,
        notification::{NotificationId, SubjectId},
        patient::{Condition, GenderFilter},
        session::Session,
    };
    use medboard_core::{MarkRead, RowStore};
    use medboard_store::InMemoryRowStore;

    use crate::mock_data::{self, DOCTOR_ID, OTHER_DOCTOR_ID};
    use crate::{ChartKind, Dashboard, DashboardConfig};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
    }

    fn seeded_store() -> InMemoryRowStore {
        let store = InMemoryRowStore::new();
        mock_data::seed(&store, &DashboardConfig::default().tables);
        store
    }

    fn open(store: &InMemoryRowStore) -> Dashboard {
        let shared: Arc<dyn RowStore> = Arc::new(store.clone());
        Dashboard::open(
            shared,
            &DashboardConfig::default(),
            &Session::doctor(),
            SubjectId::new(DOCTOR_ID),
            now(),
        )
        .expect("doctor session must open the dashboard")
    }

    fn object(value: Value) -> medboard_contracts::row::Row {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    fn months(pairs: &[(usize, u32)]) -> [u32; 12] {
        let mut buckets = [0; 12];
        for (month, count) in pairs {
            buckets[*month] = *count;
        }
        buckets
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    #[test]
    fn empty_config_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.tables.patients, "patients");
        assert_eq!(config.tables.notifications, "notifications");
        assert_eq!(config.filters.type1_gender, GenderFilter::All);
    }

    #[test]
    fn config_parses_every_section() {
        let toml = r#"
            [tables]
            patients = "clinic_patients"
            notifications = "clinic_notifications"

            [calendar]
            utc_offset_minutes = -300

            [filters]
            type1_gender = "female"
            type2_gender = "male"
        "#;
        let config = DashboardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.tables.patients, "clinic_patients");
        assert_eq!(config.calendar.utc_offset_minutes, -300);
        assert_eq!(config.filters.type1_gender, GenderFilter::Female);
        assert_eq!(config.filters.type2_gender, GenderFilter::Male);
        assert_eq!(config.calendar().unwrap().offset().local_minus_utc(), -300 * 60);
    }

    #[test]
    fn config_rejects_bad_values() {
        for toml in [
            "[calendar]\nutc_offset_minutes = 1440",
            "[tables]\npatients = \"  \"",
            "[tables]\ndoctors = \"\"",
            "[filters]\ntype1_gender = \"both\"",
            "tables = 3",
        ] {
            let err = DashboardConfig::from_toml_str(toml).unwrap_err();
            assert!(
                matches!(err, DashError::ConfigError { .. }),
                "expected ConfigError for {toml:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let err = DashboardConfig::from_file(std::path::Path::new("/nonexistent/medboard.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    // ── Session boundary ──────────────────────────────────────────────────────

    #[test]
    fn non_doctor_session_is_refused() {
        let store = seeded_store();
        let session = Session {
            authenticated: true,
            role: "admin".to_string(),
        };
        let result = Dashboard::open(
            Arc::new(store.clone()),
            &DashboardConfig::default(),
            &session,
            SubjectId::new(DOCTOR_ID),
            now(),
        );
        assert!(matches!(result, Err(DashError::Unauthorized { .. })));
        assert_eq!(store.subscriber_count("notifications"), 0, "nothing may be opened");
    }

    // ── Charts ────────────────────────────────────────────────────────────────

    #[test]
    fn open_computes_all_three_charts() {
        let dashboard = open(&seeded_store());

        let type1 = dashboard.chart(ChartKind::Type1);
        assert_eq!(type1.series(MALE_LABEL).unwrap().counts, months(&[(0, 1), (1, 1)]));
        assert_eq!(type1.series(FEMALE_LABEL).unwrap().counts, months(&[(0, 1), (2, 1)]));

        let type2 = dashboard.chart(ChartKind::Type2);
        assert_eq!(type2.series(MALE_LABEL).unwrap().counts, months(&[(2, 1), (5, 1), (8, 1)]));
        assert_eq!(type2.series(FEMALE_LABEL).unwrap().counts, months(&[(5, 1), (10, 1)]));

        let risk = dashboard.chart(ChartKind::Risk);
        assert_eq!(risk.series[0].label, "Risk Patients (2025)");
        assert_eq!(risk.series[0].counts, months(&[(0, 2), (2, 2), (3, 1), (5, 2)]));
    }

    #[test]
    fn roster_is_scoped_to_the_subject() {
        let dashboard = open(&seeded_store());
        assert_eq!(dashboard.roster().len(), 13);
        assert!(dashboard
            .roster()
            .iter()
            .all(|p| p.doctor_id.as_ref().map(|d| d.as_str()) == Some(DOCTOR_ID)));
    }

    #[test]
    fn gender_filter_recomputes_only_its_chart() {
        let mut dashboard = open(&seeded_store());
        let before: Vec<u64> = ChartKind::ALL.iter().map(|k| dashboard.chart_revision(*k)).collect();

        assert!(dashboard.set_gender_filter(Condition::Type1Diabetes, GenderFilter::Female));

        assert_eq!(dashboard.chart_revision(ChartKind::Type1), before[0] + 1);
        assert_eq!(dashboard.chart_revision(ChartKind::Type2), before[1]);
        assert_eq!(dashboard.chart_revision(ChartKind::Risk), before[2]);

        let type1 = dashboard.chart(ChartKind::Type1);
        assert_eq!(type1.series.len(), 1);
        assert_eq!(type1.series[0].label, FEMALE_LABEL);
        assert_eq!(dashboard.filters().gender(Condition::Type1Diabetes), GenderFilter::Female);
    }

    #[test]
    fn reselecting_the_same_filter_is_a_noop() {
        let mut dashboard = open(&seeded_store());
        let rev = dashboard.chart_revision(ChartKind::Type2);
        assert!(!dashboard.set_gender_filter(Condition::Type2Diabetes, GenderFilter::All));
        assert!(!dashboard.set_year(2025));
        assert_eq!(dashboard.chart_revision(ChartKind::Type2), rev);
    }

    #[test]
    fn year_change_recomputes_only_the_risk_overview() {
        let mut dashboard = open(&seeded_store());
        let type1_rev = dashboard.chart_revision(ChartKind::Type1);
        let type1_before = dashboard.chart(ChartKind::Type1).clone();

        assert!(dashboard.set_year(2024));

        let risk = dashboard.chart(ChartKind::Risk);
        assert_eq!(risk.series[0].label, "Risk Patients (2024)");
        assert_eq!(risk.series[0].counts, months(&[(1, 1), (10, 1)]));
        assert_eq!(dashboard.chart_revision(ChartKind::Type1), type1_rev);
        assert_eq!(dashboard.chart(ChartKind::Type1), &type1_before);
    }

    #[test]
    fn year_selector_includes_substitute_for_bad_timestamps() {
        let dashboard = open(&seeded_store());
        assert_eq!(dashboard.available_years(), &[2025, 2024, 2023]);
        assert_eq!(dashboard.year_options(), vec![2025, 2024, 2023]);
        assert_eq!(dashboard.filters().year, 2025);
    }

    #[test]
    fn configured_initial_filters_shape_the_first_charts() {
        let store = seeded_store();
        let config = DashboardConfig::from_toml_str("[filters]\ntype2_gender = \"male\"").unwrap();
        let dashboard = Dashboard::open(
            Arc::new(store),
            &config,
            &Session::doctor(),
            SubjectId::new(DOCTOR_ID),
            now(),
        )
        .unwrap();
        let type2 = dashboard.chart(ChartKind::Type2);
        assert_eq!(type2.series.len(), 1);
        assert_eq!(type2.series[0].label, MALE_LABEL);
    }

    // ── Fail-soft ─────────────────────────────────────────────────────────────

    #[test]
    fn failed_queries_degrade_to_empty_views() {
        let store = seeded_store();
        store.fail_queries(true);
        let dashboard = open(&store);

        for kind in ChartKind::ALL {
            assert!(dashboard.chart(kind).is_empty(), "{kind:?} should be empty");
        }
        assert!(dashboard.notifications().records.is_empty());
        assert!(dashboard.available_years().is_empty());
        assert_eq!(dashboard.year_options(), vec![2025]);
        assert!(dashboard.is_live(), "stream opens even when the snapshot failed");
    }

    #[test]
    fn refresh_recovers_after_store_comes_back() {
        let store = seeded_store();
        store.fail_queries(true);
        let mut dashboard = open(&store);
        store.fail_queries(false);

        dashboard.refresh_roster();
        assert_eq!(dashboard.roster().len(), 13);
        assert!(!dashboard.chart(ChartKind::Risk).is_empty());
    }

    // ── Doctor profile ────────────────────────────────────────────────────────

    #[test]
    fn open_loads_the_subject_profile() {
        let dashboard = open(&seeded_store());
        let profile = dashboard.profile();
        assert_eq!(profile.id.as_str(), DOCTOR_ID);
        assert_eq!(profile.full_name.as_deref(), Some("Elena Ramirez"));
        assert_eq!(profile.greeting(), "Welcome Doctor, Elena Ramirez (Endocrinology)");
    }

    #[test]
    fn switching_subject_reloads_the_profile() {
        let mut dashboard = open(&seeded_store());
        dashboard.switch_subject(SubjectId::new(OTHER_DOCTOR_ID));
        assert_eq!(dashboard.profile().display_name(), "Chidi Okafor");
        assert_eq!(dashboard.profile().display_specialization(), FALLBACK_SPECIALIZATION);
    }

    #[test]
    fn profile_falls_back_when_missing_or_unreadable() {
        let store = seeded_store();
        store.fail_queries(true);
        let dashboard = open(&store);
        assert_eq!(dashboard.profile().id.as_str(), DOCTOR_ID);
        assert_eq!(dashboard.profile().display_name(), FALLBACK_NAME);
        assert_eq!(
            dashboard.snapshot().greeting,
            "Welcome Doctor, Doctor (Specialization)"
        );

        let empty = InMemoryRowStore::new();
        let dashboard = open(&empty);
        assert_eq!(dashboard.profile().full_name, None);
        assert_eq!(dashboard.profile().display_name(), FALLBACK_NAME);
    }

    // ── Odd-typed patient columns ─────────────────────────────────────────────

    #[test]
    fn odd_typed_patient_columns_keep_the_record_in_the_roster() {
        let store = InMemoryRowStore::new();
        store.seed(
            "patients",
            vec![
                object(json!({
                    "id": "pt-a",
                    "doctor_id": DOCTOR_ID,
                    "condition": "Type 1 Diabetes",
                    "gender": "Male",
                    "created_at": 12345,
                })),
                object(json!({
                    "id": "pt-b",
                    "doctor_id": DOCTOR_ID,
                    "condition": "Type 2 Diabetes",
                    "gender": 1,
                    "created_at": "2024-05-01T00:00:00Z",
                })),
            ],
        );
        let mut dashboard = open(&store);

        assert_eq!(dashboard.roster().len(), 2);
        assert_eq!(dashboard.available_years(), &[2025, 2024]);

        assert!(dashboard.set_year(2024));
        assert_eq!(dashboard.chart(ChartKind::Risk).total(), 1);
        assert!(
            dashboard.chart(ChartKind::Type2).is_empty(),
            "unknown gender is never counted in per-condition charts"
        );
        assert!(
            dashboard.chart(ChartKind::Type1).is_empty(),
            "unreadable timestamps never land in a bucket"
        );
    }

    // ── Notifications ─────────────────────────────────────────────────────────

    #[test]
    fn notifications_load_newest_first() {
        let dashboard = open(&seeded_store());
        let view = dashboard.notifications();
        let ids: Vec<&str> = view.records.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["nt-003", "nt-002", "nt-001"]);
        assert_eq!(view.unread_count, 2);
        assert!(view.has_unread());
    }

    #[test]
    fn live_insert_reaches_the_view_on_poll() {
        let store = seeded_store();
        let mut dashboard = open(&store);

        store.insert(
            "notifications",
            mock_data::notification("nt-004", DOCTOR_ID, "New patient assigned", false, "2025-07-01T12:30:00+00:00"),
        );
        store.insert(
            "notifications",
            mock_data::notification("nt-102", OTHER_DOCTOR_ID, "Not yours", false, "2025-07-01T12:31:00+00:00"),
        );

        assert_eq!(dashboard.poll_notifications(), 1);
        assert_eq!(dashboard.notifications().records[0].id.as_str(), "nt-004");
        assert_eq!(dashboard.unread_count(), 3);
    }

    #[test]
    fn mark_read_writes_through_to_the_store() {
        let store = seeded_store();
        let mut dashboard = open(&store);

        assert_eq!(dashboard.mark_read(&NotificationId::new("nt-002")), MarkRead::Marked);
        assert_eq!(dashboard.unread_count(), 1);
        assert_eq!(store.get("notifications", "nt-002").unwrap()["is_read"], json!(true));
    }

    #[test]
    fn mark_read_failure_is_not_rolled_back() {
        let store = seeded_store();
        let mut dashboard = open(&store);
        store.fail_updates(true);

        assert_eq!(
            dashboard.mark_read(&NotificationId::new("nt-002")),
            MarkRead::MarkedLocallyOnly
        );
        assert_eq!(dashboard.unread_count(), 1);
        assert_eq!(store.get("notifications", "nt-002").unwrap()["is_read"], json!(false));
    }

    // ── Subject switching / teardown ──────────────────────────────────────────

    #[test]
    fn switching_subject_replaces_roster_and_notifications() {
        let store = seeded_store();
        let mut dashboard = open(&store);

        dashboard.switch_subject(SubjectId::new(OTHER_DOCTOR_ID));

        assert_eq!(dashboard.subject().as_str(), OTHER_DOCTOR_ID);
        assert_eq!(dashboard.roster().len(), 2);
        let view = dashboard.notifications();
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].id.as_str(), "nt-101");
        assert_eq!(store.subscriber_count("notifications"), 1, "old subscription must be released");

        store.insert(
            "notifications",
            mock_data::notification("nt-005", DOCTOR_ID, "For the previous doctor", false, "2025-07-02T08:00:00+00:00"),
        );
        assert_eq!(dashboard.poll_notifications(), 0);
    }

    #[test]
    fn close_and_drop_release_the_subscription() {
        let store = seeded_store();
        let mut dashboard = open(&store);
        assert_eq!(store.subscriber_count("notifications"), 1);
        dashboard.close();
        assert_eq!(store.subscriber_count("notifications"), 0);
        assert!(!dashboard.is_live());

        let dashboard = open(&store);
        assert_eq!(store.subscriber_count("notifications"), 1);
        drop(dashboard);
        assert_eq!(store.subscriber_count("notifications"), 0);
    }

    #[test]
    fn snapshot_serializes_for_the_presentation_layer() {
        let dashboard = open(&seeded_store());
        let value = serde_json::to_value(dashboard.snapshot()).unwrap();

        assert_eq!(value["subject"], json!(DOCTOR_ID));
        assert_eq!(value["profile"]["specialization"], json!("Endocrinology"));
        assert_eq!(value["greeting"], json!("Welcome Doctor, Elena Ramirez (Endocrinology)"));
        assert_eq!(value["filters"]["type1_gender"], json!("all"));
        assert_eq!(value["type1"]["series"][0]["label"], json!("Male"));
        assert_eq!(value["risk"]["series"][0]["counts"].as_array().unwrap().len(), 12);
        assert_eq!(value["notifications"]["unread_count"], json!(2));
    }
}
