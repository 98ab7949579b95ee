//! Handlers for queueing calls and managing the call history.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use callpilot_core::call::{CallRequest, CallStatus, OutboundCall};
use callpilot_core::error::CoreError;
use callpilot_core::types::CallId;
use callpilot_core::validation::parse_call_request;
use callpilot_providers::twilio::MISSING_CONFIGURATION_MESSAGE;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Result of queueing a call.
#[derive(Debug, Serialize)]
pub struct QueueCallResponse {
    pub message: String,
    pub status: CallStatus,
    pub sid: Option<String>,
    pub insight: &'static str,
    pub call: CallRequest,
}

/// Body for `PATCH /calls/{id}/status`.
///
/// Either a lifecycle `status` or a raw `providerStatus` (e.g. a Twilio
/// `CallStatus` value) must be given; `status` wins when both are present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    pub status: Option<String>,
    pub provider_status: Option<String>,
    pub message: Option<String>,
}

impl UpdateStatusBody {
    fn resolve_status(&self) -> Result<CallStatus, AppError> {
        if let Some(status) = &self.status {
            return CallStatus::from_str_value(status).map_err(AppError::BadRequest);
        }
        match &self.provider_status {
            Some(raw) => CallStatus::from_provider_status(raw).ok_or_else(|| {
                AppError::BadRequest(format!("Unrecognised provider status '{raw}'"))
            }),
            None => Err(AppError::BadRequest(
                "Either status or providerStatus is required".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /calls
///
/// Validate the submission, hand it to the voice provider and record the
/// result. Nothing is recorded when validation or the provider fails.
pub async fn queue_call(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> AppResult<impl IntoResponse> {
    let draft = parse_call_request(&body)?;

    let initiator = state
        .call_initiator
        .as_ref()
        .ok_or_else(|| CoreError::Configuration(MISSING_CONFIGURATION_MESSAGE.to_string()))?;

    // The history lock is not held while the provider call is in flight.
    let mut outcome = initiator.initiate_call(&OutboundCall::from(&draft)).await?;
    let status = *outcome.status.get_or_insert(CallStatus::Queued);
    let message = outcome
        .message
        .get_or_insert_with(|| status.submission_message().to_string())
        .clone();
    let sid = outcome.sid.clone();

    let call = {
        let mut history = state.history.lock().await;
        history.record(draft, outcome)?.clone()
    };

    tracing::info!(call_id = %call.id, status = %call.status, sid = ?sid, "Call submitted");

    Ok(Json(DataResponse {
        data: QueueCallResponse {
            message,
            status: call.status,
            sid,
            insight: call.status.submission_insight(),
            call,
        },
    }))
}

/// GET /calls
///
/// The call history, newest first.
pub async fn list_calls(State(state): State<AppState>) -> impl IntoResponse {
    let history = state.history.lock().await;
    Json(DataResponse {
        data: history.entries().to_vec(),
    })
}

/// GET /calls/{id}
pub async fn get_call(
    State(state): State<AppState>,
    Path(id): Path<CallId>,
) -> AppResult<impl IntoResponse> {
    let history = state.history.lock().await;
    let call = history.get(id).cloned().ok_or(CoreError::NotFound {
        entity: "CallRequest",
        id,
    })?;
    Ok(Json(DataResponse { data: call }))
}

/// GET /calls/{id}/draft
///
/// Editable projection of a stored request, for resubmission.
pub async fn get_call_draft(
    State(state): State<AppState>,
    Path(id): Path<CallId>,
) -> AppResult<impl IntoResponse> {
    let draft = state.history.lock().await.select_for_editing(id)?;
    Ok(Json(DataResponse { data: draft }))
}

/// PATCH /calls/{id}/status
///
/// Apply a status reported after the call was queued.
pub async fn update_call_status(
    State(state): State<AppState>,
    Path(id): Path<CallId>,
    AppJson(body): AppJson<UpdateStatusBody>,
) -> AppResult<impl IntoResponse> {
    let status = body.resolve_status()?;

    let mut history = state.history.lock().await;
    let call = history.update_status(id, status, body.message)?.clone();

    Ok(Json(DataResponse { data: call }))
}
