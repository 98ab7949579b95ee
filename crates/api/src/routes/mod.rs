pub mod calls;
pub mod health;
pub mod readiness;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /scripts/generate                 generate a script (POST)
/// /readiness                        score a draft (POST)
/// /calls                            queue (POST), history (GET)
/// /calls/{id}                       one request (GET)
/// /calls/{id}/draft                 editable draft (GET)
/// /calls/{id}/status                apply status update (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/scripts", scripts::router())
        .nest("/readiness", readiness::router())
        .nest("/calls", calls::router())
}
