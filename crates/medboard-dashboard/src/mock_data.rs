//! Simulated clinic data for the MEDBOARD demo and tests.
//!
//! All data in this module is hardcoded and fictional. It deliberately
//! includes the awkward rows a real clinic table accumulates: mixed-case
//! genders, a missing gender, an unparseable timestamp, a missing
//! timestamp, and conditions the dashboard does not track.

use serde_json::{json, Value};

use medboard_contracts::row::Row;
use medboard_store::InMemoryRowStore;

use crate::config::TableConfig;

/// The primary fictional doctor.
pub const DOCTOR_ID: &str = "doc-ramirez";

/// A second fictional doctor, for account-switch scenarios.
pub const OTHER_DOCTOR_ID: &str = "doc-okafor";

fn object(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn patient(id: &str, doctor: &str, condition: &str, gender: Value, created_at: Value) -> Row {
    object(json!({
        "id": id,
        "doctor_id": doctor,
        "full_name": format!("Patient {id}"),
        "condition": condition,
        "gender": gender,
        "created_at": created_at,
    }))
}

// ── Doctors (mock) ────────────────────────────────────────────────────────────

/// Return the fictional doctor profiles. The second doctor has no
/// specialization on file.
pub fn doctor_rows() -> Vec<Row> {
    vec![
        object(json!({
            "id": DOCTOR_ID,
            "full_name": "Elena Ramirez",
            "specialization": "Endocrinology",
        })),
        object(json!({
            "id": OTHER_DOCTOR_ID,
            "full_name": "Chidi Okafor",
            "specialization": null,
        })),
    ]
}

// ── Patients (mock) ───────────────────────────────────────────────────────────

/// Return the fictional patient roster for both doctors.
pub fn patient_rows() -> Vec<Row> {
    let t1 = "Type 1 Diabetes";
    let t2 = "Type 2 Diabetes";
    let d = DOCTOR_ID;
    vec![
        patient("pt-001", d, t1, json!("Male"), json!("2025-01-14T09:12:00+00:00")),
        patient("pt-002", d, t1, json!("female"), json!("2025-01-30T15:40:00+00:00")),
        patient("pt-003", d, t1, json!("FEMALE"), json!("2025-03-02T11:05:00+00:00")),
        patient("pt-004", d, t2, json!("male"), json!("2025-03-18T08:30:00+00:00")),
        patient("pt-005", d, t2, json!("Male"), json!("2025-06-21T13:00:00+00:00")),
        patient("pt-006", d, t2, json!("Female"), json!("2025-06-22T10:45:00+00:00")),
        patient("pt-007", d, t2, json!("Female"), json!("2024-11-03T16:20:00+00:00")),
        patient("pt-008", d, t1, json!("Male"), json!("2024-02-09T07:55:00+00:00")),
        patient("pt-009", d, t1, Value::Null, json!("2025-04-11T12:00:00+00:00")),
        patient("pt-010", d, "Hypertension", json!("Male"), json!("2025-05-05T09:00:00+00:00")),
        patient("pt-011", d, t2, json!("Female"), json!("last tuesday")),
        patient("pt-012", d, t1, json!("Male"), Value::Null),
        patient("pt-013", d, t2, json!("Male"), json!("2023-09-27 14:10:00+00")),
        patient("pt-101", OTHER_DOCTOR_ID, t1, json!("Female"), json!("2025-02-02T10:00:00+00:00")),
        patient("pt-102", OTHER_DOCTOR_ID, t2, json!("Male"), json!("2025-02-15T10:00:00+00:00")),
    ]
}

// ── Notifications (mock) ──────────────────────────────────────────────────────

/// Return the fictional notification backlog for both doctors.
pub fn notification_rows() -> Vec<Row> {
    vec![
        notification("nt-001", DOCTOR_ID, "HbA1c result for pt-004 is ready", true, "2025-06-20T08:00:00+00:00"),
        notification("nt-002", DOCTOR_ID, "pt-005 booked a follow-up visit", false, "2025-06-21T13:05:00+00:00"),
        notification("nt-003", DOCTOR_ID, "Glucose log uploaded by pt-006", false, "2025-06-22T11:00:00+00:00"),
        notification("nt-101", OTHER_DOCTOR_ID, "pt-102 missed an appointment", false, "2025-02-16T09:00:00+00:00"),
    ]
}

/// Build one notification row.
pub fn notification(id: &str, doctor: &str, message: &str, is_read: bool, created_at: &str) -> Row {
    object(json!({
        "id": id,
        "doctor_id": doctor,
        "message": message,
        "is_read": is_read,
        "created_at": created_at,
    }))
}

/// Seed `store` with the mock doctors, roster and notification backlog.
pub fn seed(store: &InMemoryRowStore, tables: &TableConfig) {
    store.seed(&tables.doctors, doctor_rows());
    store.seed(&tables.patients, patient_rows());
    store.seed(&tables.notifications, notification_rows());
}
