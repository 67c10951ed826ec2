use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Extension, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::state::AppState;
use crate::tables::{AdminOps, TableSpec, TABLES};

/// Build the full application router around a shared backing-service client
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(public_routes())
        // Protected
        .merge(admin_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    // Global middleware
    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn public_routes() -> Router<AppState> {
    let mut router = Router::new()
        .route("/api/auth/login", post(public::auth::login_post))
        .route("/api/about", get(public::content::about_get))
        .route("/api/contact", post(public::contact::contact_post));

    for table in TABLES.iter().filter(|table| table.public) {
        router = router.merge(
            Router::new()
                .route(&table.collection_path(), get(public::content::collection_get))
                .layer(Extension(table)),
        );
    }

    router
}

fn admin_routes(state: AppState) -> Router<AppState> {
    let mut router = Router::new()
        .route("/api/auth/whoami", get(protected::auth::whoami_get))
        .route("/api/admin/about", put(protected::about::about_put));

    for table in TABLES.iter() {
        router = router.merge(admin_table_routes(table));
    }

    // route_layer so unknown paths still answer 404 instead of 401
    router.route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn admin_table_routes(table: &'static TableSpec) -> Router<AppState> {
    use protected::records;

    let router = match table.ops {
        AdminOps::Full => Router::new()
            .route(
                &table.admin_collection_path(),
                get(records::list).post(records::create),
            )
            .route(
                &table.admin_record_path(),
                put(records::update).delete(records::delete),
            ),
        AdminOps::ListDelete => Router::new()
            .route(&table.admin_collection_path(), get(records::list))
            .route(&table.admin_record_path(), delete(records::delete)),
    };

    router.layer(Extension(table))
}

/// Empty origin list means any origin may call the API
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
