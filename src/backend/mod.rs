//! Backend collaborator client.
//!
//! The heavy lifting (capture, transcription, summarization) happens on the
//! Meeting Copilot backend; this module is the typed seam through which the
//! rest of the service reaches its REST endpoints. The trait keeps callers
//! decoupled from the HTTP implementation.

use anyhow::Result;
use async_trait::async_trait;

use crate::meeting::{Meeting, Platform};

mod client;

pub use client::AgentClient;

/// Options for asking the backend to join a meeting.
#[derive(Debug, Clone)]
pub struct JoinMeetingOptions {
    pub meeting_url: String,
    pub platform: Platform,
    pub title: Option<String>,
}

/// The backend operations this service consumes.
#[async_trait]
pub trait MeetingBackend: Send + Sync {
    /// Full meeting history for the current user.
    async fn list_meetings(&self) -> Result<Vec<Meeting>>;

    /// Ask the backend agent to join a meeting. Returns the new meeting id.
    async fn join_meeting(&self, options: JoinMeetingOptions) -> Result<String>;

    /// Ask the backend agent to leave a meeting it is in.
    async fn end_meeting(&self, meeting_id: &str) -> Result<()>;

    /// Full transcript of a captured meeting.
    async fn transcript(&self, meeting_id: &str) -> Result<String>;
}
