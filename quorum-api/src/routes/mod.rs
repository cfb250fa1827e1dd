//! REST API Routes Module
//!
//! Route handlers organized by resource:
//! - Tasks (CRUD with auto-assignment on creation)
//! - Agents (status, chat, memory, context)
//! - Projects (catalogue, per-project tasks and status)
//! - Coordination (manual assignment, system report)
//! - Audit log
//! - Task board push/pull
//! - Service banner and health check

pub mod agents;
pub mod board;
pub mod coordinate;
pub mod health;
pub mod logs;
pub mod projects;
pub mod tasks;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::types::ServiceInfo;

pub use agents::create_router as agents_router;
pub use board::create_router as board_router;
pub use coordinate::create_router as coordinate_router;
pub use health::create_router as health_router;
pub use logs::create_router as logs_router;
pub use projects::create_router as projects_router;
pub use tasks::create_router as tasks_router;

// ============================================================================
// SERVICE ENDPOINTS
// ============================================================================

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// GET / - Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "Service",
    responses(
        (status = 200, description = "Service is running", body = ServiceInfo),
    ),
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "QUORUM multi-agent coordinator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        timestamp: Utc::now(),
    })
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Build the CORS layer. No configured origins means any origin is allowed.
pub fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        let cors = cors
            .allow_origin(origins)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

        if config.cors_allow_credentials {
            cors.allow_credentials(true)
        } else {
            cors
        }
    }
}

/// Create the complete API router.
///
/// Serves:
/// - Service banner at / and health check at /health
/// - Resource routes under /api/*
/// - OpenAPI spec at /openapi.json
/// - Swagger UI at /swagger-ui (when the swagger-ui feature is enabled)
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .merge(health_router())
        .nest("/api/tasks", tasks_router())
        .nest("/api/agents", agents_router())
        .nest("/api/projects", projects_router())
        .nest("/api/coordinate", coordinate_router())
        .nest("/api/logs", logs_router())
        .nest("/api/board", board_router())
        .route("/openapi.json", get(openapi_json));

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    router = router.layer(TraceLayer::new_for_http());

    router.layer(build_cors_layer(config)).with_state(state)
}
