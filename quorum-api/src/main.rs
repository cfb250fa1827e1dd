//! QUORUM API Server Entry Point
//!
//! Loads configuration from the environment, builds the coordinator and
//! starts the Axum HTTP server.

use axum::Router;
use quorum_api::telemetry::{init_tracing, TelemetryConfig};
use quorum_api::{build_state, create_api_router, ApiConfig, ApiError, ApiResult};
use quorum_core::QuorumConfig;

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::from_env())?;

    let config = QuorumConfig::from_env()?;
    let state = build_state(&config)?;

    let api_config = ApiConfig::from_env();
    let app: Router = create_api_router(state, &api_config);

    let addr = api_config
        .bind_addr()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address: {}", e)))?;
    tracing::info!(%addr, "Starting QUORUM API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
