//! Administrative handlers (admin role only).

use axum::extract::State;
use axum::Json;
use westeros_core::loader::load_seeds;
use westeros_core::store::ImportReport;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/load-json
///
/// Bulk-load the configured dataset file. Records whose name already exists
/// are skipped, so repeated loads are harmless.
pub async fn load_json(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    let path = &state.config.characters_file;
    let seeds = load_seeds(path)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let total = seeds.len();

    let report = state.store.import(seeds).await?;
    tracing::info!(
        username = %admin.username,
        path = %path.display(),
        total,
        inserted = report.inserted,
        skipped = report.skipped,
        "Bulk character load finished",
    );

    Ok(Json(DataResponse { data: report }))
}
