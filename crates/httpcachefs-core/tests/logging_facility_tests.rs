#![allow(clippy::unwrap_used, clippy::expect_used)]

use httpcachefs_core::errors::CacheError;
use httpcachefs_core::logging_facility::test_capture::init_test_capture;
use httpcachefs_core::{log_op_end, log_op_error, log_op_start};
use httpcachefs_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE,
};
use std::io;
use std::path::PathBuf;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, path = "/cache/a");

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 1);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .expect("Should have end event");
    assert_eq!(end_event.field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = CacheError::PersistFailed {
        path: PathBuf::from("/cache/locked.json"),
        attempts: 3,
        transient: true,
        source: io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
    };
    log_op_error!(op_name, &err, duration_ms = 70);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events();
    let error_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_CONTENTION"));
    assert_eq!(error_event.level, tracing::Level::ERROR);
}

#[test]
fn test_single_start_and_end_per_operation() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1, attempts = 1u32);

    let count = |event: &str| {
        capture.count_events(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(event))
    };
    assert_eq!(count(EVENT_START), 1);
    assert_eq!(count(EVENT_END), 1);
}
