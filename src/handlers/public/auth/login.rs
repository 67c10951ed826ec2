// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    // Missing fields are passed through empty and rejected by the identity service
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Value,
}

/// POST /api/auth/login - Exchange email and password for an access token
///
/// Expected Input:
/// ```json
/// { "email": "owner@example.com", "password": "..." }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "user": { "id": "...", "email": "..." } }
/// ```
///
/// Rejected credentials answer 400 with the identity service's message; a body
/// that is not a JSON object of strings answers 400 before the service is asked.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(credentials) = payload?;
    tracing::info!("Login attempt for '{}'", credentials.email);

    let session = state
        .backend
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await
        .map_err(|err| {
            if err.is_transport() {
                tracing::error!("Identity service unreachable during login: {}", err);
                return ApiError::bad_gateway("Authentication service unavailable");
            }
            tracing::warn!("Login rejected for '{}': {}", credentials.email, err.message());
            ApiError::bad_request(err.message())
        })?;

    Ok(ApiResponse::success(LoginResponse {
        token: session.access_token,
        user: session.user,
    }))
}
