use axum::routing::post;
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

/// Script routes, mounted at `/scripts`.
///
/// ```text
/// POST   /generate     -> generate_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(scripts::generate_script))
}
