// Logging tests
//
// The global subscriber can only be installed once per process, so
// initialization must tolerate being called repeatedly.

use shrinkray::logging::{build_filter, init_subscriber, DEFAULT_LOG_FILTER};

#[test]
fn test_can_initialize_tracing_subscriber() {
    assert!(init_subscriber().is_ok());
    tracing::info!(request_id = "test", "subscriber installed");
}

#[test]
fn test_initializing_twice_is_not_an_error() {
    assert!(init_subscriber().is_ok());
    assert!(init_subscriber().is_ok());
}

#[test]
fn test_default_filter_is_info() {
    assert_eq!(DEFAULT_LOG_FILTER, "info");
    assert_eq!(build_filter(None).unwrap().to_string(), "info");
}

#[test]
fn test_module_level_directives() {
    let filter = build_filter(Some("warn,shrinkray::pipeline=debug")).unwrap();
    let rendered = filter.to_string();
    assert!(rendered.contains("shrinkray::pipeline=debug"));
    assert!(rendered.contains("warn"));
}
