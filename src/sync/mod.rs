//! Real-time synchronization with the backend push stream.
//!
//! The connection manager owns the WebSocket session lifecycle, the
//! dispatcher routes decoded events into the meeting registry, and the
//! heartbeat keeps the link observable. Consumers watch the broadcast
//! notification stream and read the registry; they never touch the
//! transport.

pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod heartbeat;
pub mod status;

pub use connection::ConnectionManager;
pub use dispatcher::{DispatchOutcome, EventDispatcher};
pub use error::SyncError;
pub use event::{InboundEvent, OutboundMessage};
pub use heartbeat::Heartbeat;
pub use status::{ConnectionState, ConnectionStatus, ConnectionStatusHandle, SessionId};

/// Locally observable notification of a sync-layer happening, fanned out to
/// presentation layers over a `tokio::sync::broadcast` channel.
#[derive(Debug, Clone)]
pub enum SyncNotification {
    Connected,
    Disconnected,
    MeetingStarted { meeting_id: String },
    MeetingEnded { meeting_id: String },
    MeetingsUpdated { count: usize },
    TranscriptUpdate { text: String },
}
