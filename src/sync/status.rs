//! Connection status types and shared state handle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Lifecycle state of the transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Identifier of one transport session, from open to close.
///
/// Messages are tagged with the session they arrived on so that a frame from
/// a prior, now-closed session can never mutate state after reconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Current connection state, readable by API handlers.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub session: Option<SessionId>,
    pub connected_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub awaiting_pong: bool,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self {
            state: ConnectionState::Closed,
            session: None,
            connected_at: None,
            last_error: None,
            awaiting_pong: false,
        }
    }
}

/// Thread-safe handle for sharing connection state between the connection
/// manager, the dispatcher, and API handlers.
#[derive(Clone, Default)]
pub struct ConnectionStatusHandle {
    inner: Arc<Mutex<ConnectionStatus>>,
}

impl ConnectionStatusHandle {
    pub async fn get(&self) -> ConnectionStatus {
        self.inner.lock().await.clone()
    }

    pub async fn set_connecting(&self) {
        let mut status = self.inner.lock().await;
        status.state = ConnectionState::Connecting;
        status.session = None;
        status.awaiting_pong = false;
    }

    pub async fn set_open(&self, session: SessionId) {
        let mut status = self.inner.lock().await;
        status.state = ConnectionState::Open;
        status.session = Some(session);
        status.connected_at = Some(Utc::now());
        status.last_error = None;
        status.awaiting_pong = false;
    }

    pub async fn set_closed(&self, error: Option<String>) {
        let mut status = self.inner.lock().await;
        status.state = ConnectionState::Closed;
        status.session = None;
        status.connected_at = None;
        status.awaiting_pong = false;
        if let Some(error) = error {
            status.last_error = Some(error);
        }
    }

    /// Session id of the currently-open session, if any.
    pub async fn current_session(&self) -> Option<SessionId> {
        let status = self.inner.lock().await;
        match status.state {
            ConnectionState::Open => status.session,
            _ => None,
        }
    }

    /// Record that a heartbeat probe was sent. Returns true if the previous
    /// probe was still unanswered.
    pub async fn mark_ping_sent(&self) -> bool {
        let mut status = self.inner.lock().await;
        let was_awaiting = status.awaiting_pong;
        status.awaiting_pong = true;
        was_awaiting
    }

    pub async fn mark_pong_received(&self) {
        let mut status = self.inner.lock().await;
        status.awaiting_pong = false;
    }
}
