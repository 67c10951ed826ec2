use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity resolved by the backing service for the current request
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    /// Full user object as returned by the identity service
    pub identity: Value,
}

impl From<Value> for AuthUser {
    fn from(identity: Value) -> Self {
        let field = |name: &str| identity.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            id: field("id").unwrap_or_default(),
            email: field("email"),
            role: field("role"),
            identity,
        }
    }
}

/// Bearer token authentication middleware. The token is verified by the
/// backing service on every request; nothing is cached locally.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("Access denied"))?;

    let identity = match state.backend.get_user(token).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            tracing::warn!("Token verification returned no identity");
            return Err(ApiError::forbidden("Invalid or expired token"));
        }
        Err(err) if err.is_transport() => {
            tracing::error!("Identity service unreachable: {}", err);
            return Err(ApiError::bad_gateway("Authentication service unavailable"));
        }
        Err(err) => {
            tracing::warn!("Token verification failed: {}", err.message());
            return Err(ApiError::forbidden("Invalid or expired token"));
        }
    };

    let auth_user = AuthUser::from(identity);
    tracing::debug!("Authenticated request for user {}", auth_user.id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
