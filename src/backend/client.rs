//! HTTP client for the Meeting Copilot agent API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::meeting::{Meeting, Platform};
use crate::sync::SyncError;

use super::{JoinMeetingOptions, MeetingBackend};

/// Standard response envelope used by the agent endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JoinData {
    meeting_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct TranscriptData {
    full_transcript: String,
}

#[derive(Debug, Serialize)]
struct JoinMeetingPayload {
    meeting_url: String,
    platform: Platform,
    title: Option<String>,
    oauth_token: Option<String>,
}

/// Client for the backend's `/api/agent` endpoints.
pub struct AgentClient {
    client: reqwest::Client,
    base_url: String,
    oauth_token: Option<String>,
}

impl AgentClient {
    pub fn new(base_url: &str, oauth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            oauth_token,
        }
    }

    pub fn from_config(server: &ServerConfig) -> Self {
        Self::new(&server.base_url, server.oauth_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Unwrap an envelope, preserving the server's message on failure.
    fn unwrap_envelope<T>(envelope: Envelope<T>, operation: &str) -> Result<T> {
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "no error message provided".to_string());
            return Err(SyncError::Collaborator(format!("{}: {}", operation, message)).into());
        }
        envelope.data.ok_or_else(|| {
            SyncError::Collaborator(format!("{}: response carried no data", operation)).into()
        })
    }

    async fn check_status(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                SyncError::Collaborator(format!("{} failed with {}: {}", operation, status, body))
                    .into(),
            );
        }
        Ok(response)
    }
}

#[async_trait]
impl MeetingBackend for AgentClient {
    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        debug!("Fetching meeting history from backend");

        let response = self
            .client
            .get(self.url("/api/agent/meetings"))
            .send()
            .await
            .context("Failed to reach backend meetings endpoint")?;

        let response = Self::check_status(response, "list meetings").await?;
        let meetings: Vec<Meeting> = response
            .json()
            .await
            .context("Failed to parse meeting list")?;

        debug!("Backend returned {} meetings", meetings.len());
        Ok(meetings)
    }

    async fn join_meeting(&self, options: JoinMeetingOptions) -> Result<String> {
        info!(
            "Requesting backend to join meeting at {} ({})",
            options.meeting_url,
            options.platform.as_str()
        );

        let payload = JoinMeetingPayload {
            meeting_url: options.meeting_url,
            platform: options.platform,
            title: options.title,
            oauth_token: self.oauth_token.clone(),
        };

        let response = self
            .client
            .post(self.url("/api/agent/join_meeting"))
            .json(&payload)
            .send()
            .await
            .context("Failed to reach backend join endpoint")?;

        let response = Self::check_status(response, "join meeting").await?;
        let envelope: Envelope<JoinData> = response
            .json()
            .await
            .context("Failed to parse join response")?;

        let data = Self::unwrap_envelope(envelope, "join meeting")?;
        info!("Backend joined meeting {}", data.meeting_id);
        Ok(data.meeting_id)
    }

    async fn end_meeting(&self, meeting_id: &str) -> Result<()> {
        info!("Requesting backend to end meeting {}", meeting_id);

        let response = self
            .client
            .post(self.url(&format!("/api/agent/end_meeting/{}", meeting_id)))
            .send()
            .await
            .context("Failed to reach backend end-meeting endpoint")?;

        let response = Self::check_status(response, "end meeting").await?;
        let envelope: Envelope<serde_json::Value> = response
            .json()
            .await
            .context("Failed to parse end-meeting response")?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "no error message provided".to_string());
            return Err(SyncError::Collaborator(format!("end meeting: {}", message)).into());
        }
        Ok(())
    }

    async fn transcript(&self, meeting_id: &str) -> Result<String> {
        debug!("Fetching transcript for meeting {}", meeting_id);

        let response = self
            .client
            .get(self.url(&format!("/api/agent/meeting/{}/transcript", meeting_id)))
            .send()
            .await
            .context("Failed to reach backend transcript endpoint")?;

        let response = Self::check_status(response, "fetch transcript").await?;
        let envelope: Envelope<TranscriptData> = response
            .json()
            .await
            .context("Failed to parse transcript response")?;

        let data = Self::unwrap_envelope(envelope, "fetch transcript")?;
        Ok(data.full_transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let envelope: Envelope<JoinData> = serde_json::from_str(
            r#"{"success":true,"data":{"meeting_id":"m42"},"message":"Agent joined"}"#,
        )
        .unwrap();

        let data = AgentClient::unwrap_envelope(envelope, "join meeting").unwrap();
        assert_eq!(data.meeting_id, "m42");
    }

    #[test]
    fn test_envelope_failure_preserves_message() {
        let envelope: Envelope<JoinData> =
            serde_json::from_str(r#"{"success":false,"message":"invalid meeting URL"}"#).unwrap();

        let err = AgentClient::unwrap_envelope(envelope, "join meeting").unwrap_err();
        assert!(err.to_string().contains("invalid meeting URL"));
    }

    #[test]
    fn test_envelope_success_without_data() {
        let envelope: Envelope<JoinData> =
            serde_json::from_str(r#"{"success":true}"#).unwrap();

        let err = AgentClient::unwrap_envelope(envelope, "join meeting").unwrap_err();
        assert!(err.to_string().contains("no data"));
    }

    #[test]
    fn test_join_payload_shape() {
        let payload = JoinMeetingPayload {
            meeting_url: "https://zoom.us/j/123".to_string(),
            platform: Platform::Zoom,
            title: Some("Standup".to_string()),
            oauth_token: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["meeting_url"], "https://zoom.us/j/123");
        assert_eq!(value["platform"], "zoom");
        assert_eq!(value["title"], "Standup");
        assert!(value["oauth_token"].is_null());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AgentClient::new("http://127.0.0.1:8000/", None);
        assert_eq!(
            client.url("/api/agent/meetings"),
            "http://127.0.0.1:8000/api/agent/meetings"
        );
    }
}
