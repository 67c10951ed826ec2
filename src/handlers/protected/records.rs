// handlers/protected/records.rs - Admin CRUD shared by every catalog table
//
// The table is injected as an `Extension<&'static TableSpec>` when the routes
// are generated, so one set of handlers serves all of them.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::tables::TableSpec;
use crate::types::Filter;

/// First row of an update result, or 404 when nothing matched
pub(crate) fn updated_row(table: &str, id: &str, rows: Vec<Value>) -> Result<Value, ApiError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found(format!("No {} record with id {}", table, id)))
}

/// GET /api/admin/:table - All rows, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(table): Extension<&'static TableSpec>,
) -> ApiResult<Vec<Value>> {
    let rows = state
        .backend
        .select(table.name, table.admin_order)
        .await
        .map_err(|err| ApiError::read_failed(table.name, err))?;

    Ok(ApiResponse::success(rows))
}

/// POST /api/admin/:table - Insert the body as a new row and return it
pub async fn create(
    State(state): State<AppState>,
    Extension(table): Extension<&'static TableSpec>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(row) = payload?;
    let rows = state
        .backend
        .insert(table.name, row, true)
        .await
        .map_err(|err| ApiError::write_failed(table.name, err))?;

    let created = rows.into_iter().next().ok_or_else(|| {
        tracing::error!("Insert into '{}' returned no row", table.name);
        ApiError::bad_gateway(format!("Insert into {} returned no row", table.name))
    })?;

    tracing::info!("{} created a row in '{}'", user.id, table.name);
    Ok(ApiResponse::created(created))
}

/// PUT /api/admin/:table/:id - Apply the body's fields to the row with this id
pub async fn update(
    State(state): State<AppState>,
    Extension(table): Extension<&'static TableSpec>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(patch) = payload?;
    let rows = state
        .backend
        .update(table.name, Filter::id(id.as_str()), patch)
        .await
        .map_err(|err| ApiError::write_failed(table.name, err))?;

    let row = updated_row(table.name, &id, rows)?;
    tracing::info!("{} updated '{}' row {}", user.id, table.name, id);
    Ok(ApiResponse::success(row))
}

/// DELETE /api/admin/:table/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(table): Extension<&'static TableSpec>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state
        .backend
        .delete(table.name, Filter::id(id.as_str()))
        .await
        .map_err(|err| ApiError::write_failed(table.name, err))?;

    tracing::info!("{} deleted '{}' row {}", user.id, table.name, id);
    Ok(ApiResponse::message("Deleted successfully"))
}
