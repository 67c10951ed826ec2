// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::extract::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - Identity resolved by the auth guard for this request
pub async fn whoami_get(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": user.id,
        "email": user.email,
        "role": user.role,
        "user": user.identity,
    })))
}
