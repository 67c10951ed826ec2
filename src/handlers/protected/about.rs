// handlers/protected/about.rs - PUT /api/admin/about handler

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::tables::{ABOUT_ID, ABOUT_TABLE};
use crate::types::Filter;

use super::records::updated_row;

/// PUT /api/admin/about - Update the profile row.
///
/// Always targets id 1; an `id` inside the payload never changes which row is updated.
pub async fn about_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(patch) = payload?;
    let rows = state
        .backend
        .update(ABOUT_TABLE, Filter::id(ABOUT_ID), patch)
        .await
        .map_err(|err| ApiError::write_failed(ABOUT_TABLE, err))?;

    let row = updated_row(ABOUT_TABLE, ABOUT_ID, rows)?;
    tracing::info!("{} updated the about record", user.id);
    Ok(ApiResponse::success(row))
}
