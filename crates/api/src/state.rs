use std::sync::Arc;

use westeros_core::store::CharacterStore;

use crate::auth::users::UserDirectory;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Character store (in-memory or PostgreSQL).
    pub store: Arc<dyn CharacterStore>,
    /// Accounts allowed to log in.
    pub users: Arc<UserDirectory>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
