//! REST API server for meetsync.
//!
//! Provides HTTP endpoints for:
//! - Sync status (connection state, session, heartbeat)
//! - Active meetings (registry snapshot)
//! - Meeting history, join/end, and transcripts (proxied to the backend)

pub mod error;
pub mod routes;

use std::sync::Arc;

use crate::backend::MeetingBackend;
use crate::config::Config;
use crate::meeting::ActiveMeetingRegistry;
use crate::sync::ConnectionStatusHandle;
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::ApiState;

pub struct ApiServer {
    port: u16,
    state: ApiState,
}

impl ApiServer {
    pub fn new(
        registry: ActiveMeetingRegistry,
        status: ConnectionStatusHandle,
        backend: Arc<dyn MeetingBackend>,
        config: &Config,
    ) -> Self {
        Self {
            port: config.api.port,
            state: ApiState {
                registry,
                status,
                backend,
            },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            // Root and version endpoints
            .route("/", get(service_info))
            .route("/version", get(version))
            // Sync and meeting routes
            .merge(routes::sync::router(self.state.clone()))
            .merge(routes::meetings::router(self.state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /                        - Service info");
        info!("  GET  /version                 - Get version info");
        info!("  GET  /status                  - Sync connection status");
        info!("  GET  /meetings/active         - Currently-active meetings");
        info!("  GET  /meetings                - Meeting history (backend)");
        info!("  POST /meetings/join           - Ask the agent to join a meeting");
        info!("  POST /meetings/:id/end        - Ask the agent to leave a meeting");
        info!("  GET  /meetings/:id/transcript - Meeting transcript (backend)");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "meetsync",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "meetsync"
    }))
}
