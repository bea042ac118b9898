//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert the handler sent the browser back to the page
pub fn assert_redirect_home(response: &TestResponse) {
    assert_status(response, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

/// Assert JSON error response has expected status field
pub fn assert_json_status(response: &TestResponse, expected_status: u16) {
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected_status as u64),
        "Expected JSON status {}, got {:?}. Full response: {}",
        expected_status,
        json["status"],
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Assert the response carries `expected` as its Content-Type
pub fn assert_content_type(response: &TestResponse, expected: &str) {
    assert_eq!(
        response.header("content-type"),
        Some(expected),
        "Unexpected Content-Type"
    );
}
