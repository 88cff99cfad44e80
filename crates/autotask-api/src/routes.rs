//! Router setup with all API routes and middleware.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use autotask_core::{AutotaskConfig, AutotaskError};

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/run", post(handlers::run_task))
        .route("/health", get(handlers::health))
        .route("/actions", get(handlers::list_actions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &AutotaskConfig, state: AppState) -> Result<(), AutotaskError> {
    let addr = format!("{}:{}", config.general.bind_addr, config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AutotaskError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| AutotaskError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
