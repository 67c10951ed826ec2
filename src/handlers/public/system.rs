use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Portfolio Gateway",
            "version": version,
            "description": "Portfolio content API backed by a hosted Supabase project",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/api/auth/login (public - token acquisition)",
                "content": "/api/about, /api/{skills,projects,blogs,experience,testimonials,services} (public)",
                "contact": "/api/contact (public)",
                "whoami": "/api/auth/whoami (protected)",
                "admin": "/api/admin/:table[/:id], /api/admin/about, /api/admin/messages[/:id] (protected)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.backend.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "backend": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "backing service unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "backend_error": e.to_string()
                    }
                })),
            )
        }
    }
}
