pub mod admin;
pub mod auth;
pub mod character;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                    login (public)
///
/// /characters                    list (public), create (auth)
/// /characters/{id}               get (public), update, delete (auth)
///
/// /admin/load-json               bulk load dataset (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/characters", character::router())
        .nest("/admin", admin::router())
}
