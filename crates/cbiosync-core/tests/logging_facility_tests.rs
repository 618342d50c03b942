#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cbiosync_core::errors::{ClinicalError, ExErrorKind};
use cbiosync_core::logging_facility::init_test_capture;
use cbiosync_core::source::ClinicalEvent;
use cbiosync_core::timeline::render_current_events;
use cbiosync_core::types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use cbiosync_core::{log_op_end, log_op_error, log_op_start, reconcile};
use common::{FakeSource, Fixture};

#[test]
fn test_log_op_start_and_end() {
    let capture = init_test_capture();
    let op_name = "test_log_op_unique_1";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 42);

    capture.assert_event_exists(op_name, EVENT_START);
    let end = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_2";

    let err = ClinicalError::TruncatedFile {
        path: "sample.txt".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 3);

    let error = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .unwrap();
    assert_eq!(
        error.field("err.code"),
        Some(ExErrorKind::TruncatedFile.code())
    );
}

#[test]
fn test_reconcile_logs_domain_boundaries() {
    let capture = init_test_capture();
    let fixture = Fixture::new(&["P1\tA\t1\n"], &["P1\tLIVING\n"]);
    let source = FakeSource::default()
        .sample_attr("x")
        .sample("P1", "A", "x", "1")
        .patient("P1", "OS_STATUS", "0:LIVING");

    reconcile(&source, &fixture.config()).unwrap();

    capture.assert_event_exists("reconcile_domain", EVENT_START);
    capture.assert_event_exists("reconcile_domain", EVENT_END);
    capture.assert_event_exists("reconcile", EVENT_END);
}

#[test]
fn test_unprefixed_status_is_a_warning() {
    let capture = init_test_capture();
    let fixture = Fixture::new(&["P1\tA\t1\n"], &["P_WARN\tDECEASED\n"]);
    let source = FakeSource::default().patient("P_WARN", "OS_STATUS", "DECEASED");

    reconcile(&source, &fixture.config()).unwrap();

    let warnings = capture.warnings_containing("no ordinal prefix");
    assert!(warnings
        .iter()
        .any(|w| w.field("record_id") == Some("P_WARN")));
}

#[test]
fn test_unknown_event_type_is_a_warning() {
    let capture = init_test_capture();
    let events: Vec<ClinicalEvent> = serde_json::from_value(serde_json::json!([{
        "patientId": "P1",
        "startNumberOfDaysSinceDiagnosis": 1,
        "eventType": "RADIATION_UNIQUE_TYPE",
        "attributes": []
    }]))
    .unwrap();

    let rendered = render_current_events(&events);

    assert!(rendered.is_empty());
    let warnings = capture.warnings_containing("no timeline schema");
    assert!(warnings
        .iter()
        .any(|w| w.field("event_type") == Some("RADIATION_UNIQUE_TYPE")));
}
