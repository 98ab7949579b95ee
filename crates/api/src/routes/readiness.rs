use axum::routing::post;
use axum::Router;

use crate::handlers::readiness;
use crate::state::AppState;

/// Readiness routes, mounted at `/readiness`.
///
/// ```text
/// POST   /             -> score_draft
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(readiness::score_draft))
}
