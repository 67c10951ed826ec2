// handlers/public/contact.rs - POST /api/contact handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::tables::MESSAGES_TABLE;

/// POST /api/contact - Store a visitor message verbatim in `messages`
pub async fn contact_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(message) = payload?;
    state
        .backend
        .insert(MESSAGES_TABLE, message, false)
        .await
        .map_err(|err| ApiError::write_failed(MESSAGES_TABLE, err))?;

    tracing::info!("Contact message stored");
    Ok(ApiResponse::message("Sent!"))
}
