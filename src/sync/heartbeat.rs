//! Heartbeat probe construction.
//!
//! The connection manager drives probes from a timer inside the session
//! loop, so probes stop the moment the session ends. This type only builds
//! the frame and tracks whether the previous probe was answered; a missing
//! pong is informational, never an error.

use tracing::debug;

use super::event::OutboundMessage;
use super::status::ConnectionStatusHandle;

pub struct Heartbeat {
    status: ConnectionStatusHandle,
}

impl Heartbeat {
    pub fn new(status: ConnectionStatusHandle) -> Self {
        Self { status }
    }

    /// Build the next probe frame and mark it outstanding.
    pub async fn probe(&self) -> String {
        if self.status.mark_ping_sent().await {
            debug!("Previous heartbeat probe was not answered");
        }
        OutboundMessage::ping_now().to_frame()
    }
}
