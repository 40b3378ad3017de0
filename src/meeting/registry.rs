//! In-memory registry of currently-active meetings.
//!
//! The registry mirrors server state pushed over the WebSocket; it is a
//! cache, not the source of truth. Incremental events insert and remove
//! single entries, and a full `meetings_update` snapshot from the server
//! overwrites everything, correcting any drift from missed events.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::model::Meeting;

/// Thread-safe handle to the active-meeting map, shared between the event
/// dispatcher and API handlers.
#[derive(Clone, Default)]
pub struct ActiveMeetingRegistry {
    inner: Arc<Mutex<HashMap<String, Meeting>>>,
}

impl ActiveMeetingRegistry {
    /// Insert or overwrite a meeting by id. Applying the same meeting twice
    /// leaves the registry unchanged after the first call.
    pub async fn upsert(&self, meeting: Meeting) {
        let mut map = self.inner.lock().await;
        map.insert(meeting.meeting_id.clone(), meeting);
    }

    /// Remove a meeting by id, returning it if it was present. Removing an
    /// unknown id is a no-op.
    pub async fn remove(&self, meeting_id: &str) -> Option<Meeting> {
        let mut map = self.inner.lock().await;
        map.remove(meeting_id)
    }

    /// Discard all current entries and install the given list. Duplicate ids
    /// within the input collapse to the last occurrence.
    pub async fn replace_all(&self, meetings: Vec<Meeting>) {
        let mut map = self.inner.lock().await;
        map.clear();
        for meeting in meetings {
            map.insert(meeting.meeting_id.clone(), meeting);
        }
    }

    pub async fn get(&self, meeting_id: &str) -> Option<Meeting> {
        let map = self.inner.lock().await;
        map.get(meeting_id).cloned()
    }

    pub async fn len(&self) -> usize {
        let map = self.inner.lock().await;
        map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Point-in-time copy of the registry contents, ordered by start time
    /// (unknown start times last, ties broken by id). Callers never see the
    /// live map.
    pub async fn snapshot(&self) -> Vec<Meeting> {
        let map = self.inner.lock().await;
        let mut meetings: Vec<Meeting> = map.values().cloned().collect();
        meetings.sort_by(|a, b| match (&a.start_time, &b.start_time) {
            (Some(x), Some(y)) => x.cmp(y).then_with(|| a.meeting_id.cmp(&b.meeting_id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.meeting_id.cmp(&b.meeting_id),
        });
        meetings
    }
}
