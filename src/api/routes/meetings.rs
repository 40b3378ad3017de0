//! Meeting endpoints.
//!
//! Provides HTTP endpoints for:
//! - Listing currently-active meetings (GET /meetings/active)
//! - Listing meeting history from the backend (GET /meetings)
//! - Asking the backend agent to join a meeting (POST /meetings/join)
//! - Asking the backend agent to end a meeting (POST /meetings/:id/end)
//! - Fetching a meeting transcript (GET /meetings/:id/transcript)
//!
//! Active meetings are served from the local registry; everything else is
//! proxied to the backend collaborator, whose failures surface as 502.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::backend::JoinMeetingOptions;
use crate::meeting::Platform;

use super::ApiState;

/// Request body for the join endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct JoinRequest {
    pub meeting_url: String,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub title: Option<String>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/meetings/active", get(active_meetings))
        .route("/meetings", get(list_meetings))
        .route("/meetings/join", post(join_meeting))
        .route("/meetings/:id/end", post(end_meeting))
        .route("/meetings/:id/transcript", get(meeting_transcript))
        .with_state(state)
}

/// Snapshot of the meetings currently believed active.
async fn active_meetings(State(state): State<ApiState>) -> Json<Value> {
    let meetings = state.registry.snapshot().await;
    Json(json!({ "meetings": meetings }))
}

/// Full meeting history, straight from the backend.
async fn list_meetings(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let meetings = state
        .backend
        .list_meetings()
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(Json(json!({ "meetings": meetings })))
}

async fn join_meeting(
    State(state): State<ApiState>,
    Json(request): Json<JoinRequest>,
) -> ApiResult<Json<Value>> {
    if request.meeting_url.trim().is_empty() {
        return Err(ApiError::bad_request("meeting_url must not be empty"));
    }

    info!("Join meeting requested via API: {}", request.meeting_url);

    let options = JoinMeetingOptions {
        meeting_url: request.meeting_url,
        platform: request.platform.unwrap_or(Platform::Zoom),
        title: request.title,
    };

    let meeting_id = state
        .backend
        .join_meeting(options)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "meeting_id": meeting_id,
        "message": "Agent is joining the meeting",
    })))
}

async fn end_meeting(
    Path(id): Path<String>,
    State(state): State<ApiState>,
) -> ApiResult<Json<Value>> {
    info!("End meeting {} requested via API", id);

    state
        .backend
        .end_meeting(&id)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "meeting_id": id,
        "message": "Agent is leaving the meeting",
    })))
}

async fn meeting_transcript(
    Path(id): Path<String>,
    State(state): State<ApiState>,
) -> ApiResult<Json<Value>> {
    let transcript = state
        .backend
        .transcript(&id)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(Json(json!({
        "meeting_id": id,
        "transcript": transcript,
    })))
}
