#![allow(clippy::unwrap_used, clippy::expect_used)]

use ambrosia_core::errors::{AmErrorKind, AmbrosiaError};
use ambrosia_core::logging_facility::test_capture::init_test_capture;
use ambrosia_core::{log_op_end, log_op_error, log_op_start};
use ambrosia_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, recipe_id = "abc-123");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("recipe_id"), Some("abc-123"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42, row_count = 3);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
    assert_eq!(events[0].field("row_count"), Some("3"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    log_op_error!(op_name, AmbrosiaError::Cancelled, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events_for_op(op_name);
    assert_eq!(
        events[0].field("err_kind"),
        Some(format!("{:?}", AmErrorKind::Cancelled).as_str())
    );
    assert_eq!(events[0].field("err_code"), Some("ERR_CANCELLED"));
    assert_eq!(events[0].level, tracing::Level::ERROR);
}
