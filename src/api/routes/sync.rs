//! Connection status endpoint.

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};

use super::ApiState;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/status", get(sync_status))
        .with_state(state)
}

/// Current sync-layer status: connection state, session, active meetings.
async fn sync_status(State(state): State<ApiState>) -> Json<Value> {
    let status = state.status.get().await;
    let active_meetings = state.registry.len().await;

    Json(json!({
        "connected": status.state == crate::sync::ConnectionState::Open,
        "state": status.state.as_str(),
        "session": status.session.map(|s| s.to_string()),
        "connected_at": status.connected_at.map(|t| t.to_rfc3339()),
        "active_meetings": active_meetings,
        "awaiting_pong": status.awaiting_pong,
        "last_error": status.last_error,
    }))
}
