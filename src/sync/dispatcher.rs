//! Decode-and-route for inbound push events.
//!
//! Incremental events (`meeting_started`/`meeting_ended`) are best-effort
//! hints; a `meetings_update` snapshot is authoritative and overwrites the
//! registry, correcting drift from missed or duplicated increments. No event
//! can halt dispatch: decode failures and unknown tags are logged and
//! dropped.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::meeting::ActiveMeetingRegistry;

use super::event::InboundEvent;
use super::status::{ConnectionStatusHandle, SessionId};
use super::SyncNotification;

/// What happened to one dispatched message. Exposed so routing behavior is
/// directly testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event was decoded and its effect applied.
    Applied,
    /// The event tag is not one this client understands; dropped.
    UnknownEvent,
    /// The payload could not be decoded; dropped.
    DecodeFailed,
    /// The message arrived on a session that is no longer current; dropped
    /// without touching the registry.
    StaleSession,
}

#[derive(Clone)]
pub struct EventDispatcher {
    registry: ActiveMeetingRegistry,
    status: ConnectionStatusHandle,
    notify: broadcast::Sender<SyncNotification>,
}

impl EventDispatcher {
    pub fn new(
        registry: ActiveMeetingRegistry,
        status: ConnectionStatusHandle,
        notify: broadcast::Sender<SyncNotification>,
    ) -> Self {
        Self {
            registry,
            status,
            notify,
        }
    }

    /// Dispatch one raw text frame received on `session`.
    pub async fn dispatch(&self, session: SessionId, raw: &str) -> DispatchOutcome {
        if self.status.current_session().await != Some(session) {
            debug!("Dropping message from stale session {}", session);
            return DispatchOutcome::StaleSession;
        }

        let event = match InboundEvent::decode(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping undecodable message: {}", e);
                return DispatchOutcome::DecodeFailed;
            }
        };

        match event {
            InboundEvent::MeetingStarted { meeting } => {
                info!(
                    "Meeting started: {} ({})",
                    meeting.meeting_id,
                    meeting.platform.as_str()
                );
                let meeting_id = meeting.meeting_id.clone();
                self.registry.upsert(meeting).await;
                self.emit(SyncNotification::MeetingStarted { meeting_id });
                DispatchOutcome::Applied
            }
            InboundEvent::MeetingEnded { meeting_id, .. } => {
                info!("Meeting ended: {}", meeting_id);
                self.registry.remove(&meeting_id).await;
                // The notification also prompts a history refresh upstream
                self.emit(SyncNotification::MeetingEnded { meeting_id });
                DispatchOutcome::Applied
            }
            InboundEvent::MeetingsUpdate { meetings } => {
                let listed = meetings.len();
                self.registry.replace_all(meetings).await;
                let count = self.registry.len().await;
                debug!(
                    "Reconciled active meetings from snapshot ({} listed, {} active)",
                    listed, count
                );
                self.emit(SyncNotification::MeetingsUpdated { count });
                DispatchOutcome::Applied
            }
            InboundEvent::TranscriptUpdate { text } => {
                // Forwarded to presentation, never stored
                self.emit(SyncNotification::TranscriptUpdate { text });
                DispatchOutcome::Applied
            }
            InboundEvent::Pong { .. } => {
                self.status.mark_pong_received().await;
                DispatchOutcome::Applied
            }
            InboundEvent::Unknown { raw_tag } => {
                warn!("Ignoring unhandled event type '{}'", raw_tag);
                DispatchOutcome::UnknownEvent
            }
        }
    }

    fn emit(&self, notification: SyncNotification) {
        // Nobody listening is fine; the registry is still the source for reads
        let _ = self.notify.send(notification);
    }
}
