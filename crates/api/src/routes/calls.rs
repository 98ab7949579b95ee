use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::calls;
use crate::state::AppState;

/// Call request routes, mounted at `/calls`.
///
/// ```text
/// GET    /              -> list_calls
/// POST   /              -> queue_call
/// GET    /{id}          -> get_call
/// GET    /{id}/draft    -> get_call_draft
/// PATCH  /{id}/status   -> update_call_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(calls::list_calls).post(calls::queue_call))
        .route("/{id}", get(calls::get_call))
        .route("/{id}/draft", get(calls::get_call_draft))
        .route("/{id}/status", patch(calls::update_call_status))
}
