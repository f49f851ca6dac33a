//! Response envelope helpers
//!
//! Every endpoint answers `{success: true, ...}` or
//! `{success: false, message}`; these helpers keep the envelope in one
//! place.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub fn ok(payload: Value) -> Response {
    Json(payload).into_response()
}

pub fn created(payload: Value) -> Response {
    (StatusCode::CREATED, Json(payload)).into_response()
}

pub fn not_found(message: &str) -> Response {
    failure(StatusCode::NOT_FOUND, message)
}

pub fn bad_request(message: &str) -> Response {
    failure(StatusCode::BAD_REQUEST, message)
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let resp = not_found("IPO not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_status() {
        let resp = bad_request("symbol is required");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ok_status() {
        let resp = ok(json!({"success": true}));
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
