//! Handlers for the `/characters` resource.
//!
//! Reads are public. Writes require a bearer token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use westeros_core::character::{Character, NewCharacter, UpdateCharacter};
use westeros_core::error::CoreError;
use westeros_core::query::{self, ListParams};
use westeros_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Character",
        id,
    })
}

/// GET /api/v1/characters
///
/// Filter, sort and paginate the full character set. Without a positive
/// `limit` the response is a sample of at most 20 records.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Vec<Character>>> {
    let records = state.store.list_all().await?;
    let characters = query::list(records, &params)?;
    Ok(Json(characters))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Character>> {
    let character = state.store.get_by_id(id).await?.ok_or(not_found(id))?;
    Ok(Json(character))
}

/// POST /api/v1/characters
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppJson(input): AppJson<NewCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    let input = input.normalized();
    input.validate()?;

    let character = state.store.insert(input).await?;
    tracing::info!(
        id = character.id,
        name = %character.name,
        username = %user.username,
        "Character created",
    );
    Ok((StatusCode::CREATED, Json(character)))
}

/// PATCH /api/v1/characters/{id}
///
/// Only the supplied fields change. An explicit `null` clears an optional
/// field.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    let input = input.normalized();
    input.validate()?;

    let character = state
        .store
        .update_fields(id, input)
        .await?
        .ok_or(not_found(id))?;
    tracing::info!(id, username = %user.username, "Character updated");
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete(id).await? {
        tracing::info!(id, username = %user.username, "Character deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
