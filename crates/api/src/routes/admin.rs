use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// POST   /load-json     -> load_json
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/load-json", post(admin::load_json))
}
