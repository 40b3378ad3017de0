//! Meeting domain module.
//!
//! Holds the meeting record types shared across the crate and the in-memory
//! registry of meetings currently believed active, kept converged with
//! server truth by the sync layer.

pub mod model;
pub mod registry;

pub use model::{Meeting, MeetingStatus, Platform};
pub use registry::ActiveMeetingRegistry;
