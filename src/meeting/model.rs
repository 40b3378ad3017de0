//! Meeting record types shared by the sync layer, the backend client, and
//! the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Video platform a meeting runs on.
///
/// Deserialized through [`Platform::parse`] so that a platform tag this
/// client does not know maps to `Unknown` instead of failing the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Platform {
    Zoom,
    GoogleMeet,
    Teams,
    ManualUpload,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::GoogleMeet => "google_meet",
            Self::Teams => "teams",
            Self::ManualUpload => "manual_upload",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a user-supplied platform name. Unrecognized names map to
    /// `Unknown` rather than failing, since the backend treats the platform
    /// as a display tag.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "zoom" => Self::Zoom,
            "google_meet" | "googlemeet" | "meet" => Self::GoogleMeet,
            "teams" | "ms_teams" => Self::Teams,
            "manual_upload" | "upload" => Self::ManualUpload,
            _ => Self::Unknown,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Lifecycle status of a meeting as reported by the server.
///
/// The backend's status vocabulary may grow; unrecognized values map to
/// `Unknown` instead of failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MeetingStatus {
    Scheduled,
    Active,
    Completed,
    Failed,
    Unknown,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Self::Scheduled,
            "active" => Self::Active,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for MeetingStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl Default for MeetingStatus {
    fn default() -> Self {
        // Push events announce live meetings and frequently omit the status
        // field, so absence means the meeting is running.
        Self::Active
    }
}

/// One observed meeting session. `meeting_id` is the registry key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub meeting_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: MeetingStatus,
}

impl Meeting {
    /// Seconds since the meeting started, if a start time is known.
    pub fn duration_seconds(&self) -> Option<u64> {
        self.start_time.map(|started| {
            let elapsed = Utc::now() - started;
            elapsed.num_seconds().max(0) as u64
        })
    }
}
