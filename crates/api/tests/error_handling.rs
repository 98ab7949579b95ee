//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use callpilot_api::error::AppError;
use callpilot_core::call::CallStatus;
use callpilot_core::error::CoreError;
use callpilot_core::store::StorageError;
use callpilot_core::validation::FieldViolation;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn validation_error_returns_422_with_issues() {
    let err = AppError::Core(CoreError::Validation(vec![FieldViolation::new(
        "clientName",
        "is required",
    )]));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["issues"][0]["field"], "clientName");
    assert_eq!(json["issues"][0]["message"], "is required");
}

#[tokio::test]
async fn invalid_transition_returns_409() {
    let err = AppError::Core(CoreError::InvalidTransition {
        from: CallStatus::Completed,
        to: CallStatus::Queued,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn configuration_error_returns_503() {
    let err = AppError::Core(CoreError::Configuration("Twilio missing".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "CONFIGURATION_MISSING");
    assert_eq!(json["error"], "Twilio missing");
}

#[tokio::test]
async fn provider_error_keeps_message() {
    let err = AppError::Core(CoreError::Provider("Authenticate".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "PROVIDER_ERROR");
    assert_eq!(json["error"], "Authenticate");
}

#[tokio::test]
async fn storage_error_is_sanitized() {
    let err = AppError::Core(CoreError::Storage(StorageError::Unavailable(
        "/var/lib/callpilot is read-only".into(),
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("nope".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "nope");
}
