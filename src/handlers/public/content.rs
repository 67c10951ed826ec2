// handlers/public/content.rs - Read-only portfolio content

use axum::extract::{Extension, State};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::tables::{TableSpec, ABOUT_TABLE};

/// GET /api/about - The single profile row
pub async fn about_get(State(state): State<AppState>) -> ApiResult<Value> {
    match state.backend.select_single(ABOUT_TABLE).await {
        Ok(Some(row)) => Ok(ApiResponse::success(row)),
        Ok(None) => Err(ApiError::not_found("About record not found")),
        Err(err) => Err(ApiError::read_failed(ABOUT_TABLE, err)),
    }
}

/// GET /api/<table> - All rows, oldest first
pub async fn collection_get(
    State(state): State<AppState>,
    Extension(table): Extension<&'static TableSpec>,
) -> ApiResult<Vec<Value>> {
    let rows = state
        .backend
        .select(table.name, table.public_order())
        .await
        .map_err(|err| ApiError::read_failed(table.name, err))?;

    Ok(ApiResponse::success(rows))
}
