//! HTTP surface
//!
//! `POST /feedback` runs the schema gate and then the orchestrator;
//! `GET /health` is a liveness probe. Every route answers cross-origin
//! requests from any origin.

mod error;
mod routes;

pub use error::{AppError, AppResult};

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::feedback::FeedbackService;
use crate::schema::SchemaGate;
use crate::types::{FeedbackError, Result};

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub service: Arc<FeedbackService>,
    pub gate: Arc<SchemaGate>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            service: Arc::new(FeedbackService::from_config(&config.openai)?),
            gate: Arc::new(SchemaGate::from_config(&config.schema)?),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/feedback", post(routes::feedback))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn start(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);

    let provider = state.service.provider();
    match provider.health_check().await {
        Ok(true) => info!("Completion provider {} ({}) reachable", provider.name(), provider.model()),
        _ => warn!(
            "Completion provider {} not reachable; requests will return degraded feedback",
            provider.name()
        ),
    }

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| FeedbackError::Server(format!("Failed to bind {}: {}", address, e)))?;

    info!("Listening on http://{}", address);

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FeedbackError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
