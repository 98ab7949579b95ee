//! Handlers for script generation.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use callpilot_core::script::{generate_with_fallback, generation_insight};
use callpilot_core::validation::parse_script_input;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScriptResponse {
    pub script: String,
    pub used_fallback: bool,
    pub insight: &'static str,
}

/// POST /scripts/generate
///
/// Ask the AI generator for a script, falling back to local synthesis when
/// it is not configured or fails. Only validation errors reach the caller.
pub async fn generate_script(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> AppResult<impl IntoResponse> {
    let input = parse_script_input(&body)?;

    let generated = generate_with_fallback(state.script_generator.as_deref(), &input).await;

    tracing::info!(
        client_name = %input.client_name,
        used_fallback = generated.used_fallback,
        "Script generated"
    );

    Ok(Json(DataResponse {
        data: GenerateScriptResponse {
            insight: generation_insight(generated.used_fallback),
            script: generated.script,
            used_fallback: generated.used_fallback,
        },
    }))
}
