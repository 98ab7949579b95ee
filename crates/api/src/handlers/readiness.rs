use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use callpilot_core::readiness;
use callpilot_core::validation::parse_partial_draft;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;

/// POST /readiness
///
/// Score a (possibly partial) draft. Missing and `null` fields count as empty.
pub async fn score_draft(AppJson(body): AppJson<Value>) -> AppResult<impl IntoResponse> {
    let draft = parse_partial_draft(&body)?;
    Ok(Json(DataResponse {
        data: readiness::evaluate(&draft),
    }))
}
