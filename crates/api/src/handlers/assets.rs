//! Handlers for the asset registry lookup.

use axum::extract::{Query, State};
use axum::Json;
use smartpack_core::error::CoreError;
use smartpack_db::models::asset::{Asset, AssetLookup};
use smartpack_db::repositories::AssetRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/assets?asset_code= -- registry lookup for display.
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<AssetLookup>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let asset = AssetRepo::find_by_code(&state.pool, &query.asset_code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Asset",
                id: query.asset_code.clone(),
            })
        })?;

    Ok(Json(DataResponse { data: asset }))
}
