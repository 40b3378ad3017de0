//! API route modules.

pub mod meetings;
pub mod sync;

use std::sync::Arc;

use crate::backend::MeetingBackend;
use crate::meeting::ActiveMeetingRegistry;
use crate::sync::ConnectionStatusHandle;

/// Shared state for all routes.
#[derive(Clone)]
pub struct ApiState {
    pub registry: ActiveMeetingRegistry,
    pub status: ConnectionStatusHandle,
    pub backend: Arc<dyn MeetingBackend>,
}
