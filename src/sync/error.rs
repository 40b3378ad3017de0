//! Error taxonomy for the sync layer.
//!
//! None of these are fatal to the service: transport errors trigger a
//! scheduled reconnect, decode errors drop the offending message, and
//! collaborator errors surface as transient notices.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection or send failure on the WebSocket transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// A message that could not be decoded into a known event shape.
    #[error("failed to decode event: {0}")]
    Decode(String),

    /// A backend REST call failed or returned an unsuccessful response.
    #[error("backend request failed: {0}")]
    Collaborator(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for SyncError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
