//! Upload history kept by the front end.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::video::{VideoId, VideoRecord, VideoStatus};

/// Maximum number of entries kept; older ones fall off the end.
pub const HISTORY_LIMIT: usize = 50;

/// One past upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryEntry {
    pub video_id: VideoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: VideoStatus,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(video_id: VideoId, status: VideoStatus) -> Self {
        Self {
            video_id,
            filename: None,
            url: None,
            status,
            created_at: Utc::now(),
        }
    }

    /// What the user uploaded, for display.
    pub fn label(&self) -> &str {
        self.filename
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("(unknown source)")
    }
}

impl From<&VideoRecord> for HistoryEntry {
    fn from(record: &VideoRecord) -> Self {
        Self {
            video_id: record.id.clone(),
            filename: record.filename.clone(),
            url: record.url.clone(),
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// Newest-first list of uploads, capped at [`HISTORY_LIMIT`].
///
/// Stored as a plain list; loading goes through [`History::from_entries`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored entries, enforcing order and the cap.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut history = Self::new();
        for entry in entries {
            if !history.entries.iter().any(|e| e.video_id == entry.video_id) {
                history.entries.push(entry);
            }
        }
        history.entries.truncate(HISTORY_LIMIT);
        history
    }

    /// Put an entry at the front, replacing any entry with the same video id.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.retain(|e| e.video_id != entry.video_id);
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Update the stored status of an entry in place. Returns whether it was found.
    pub fn update_status(&mut self, video_id: &VideoId, status: VideoStatus) -> bool {
        match self.entries.iter_mut().find(|e| &e.video_id == video_id) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, video_id: &VideoId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| &e.video_id == video_id)
    }

    pub fn remove(&mut self, video_id: &VideoId) -> Option<HistoryEntry> {
        let pos = self.entries.iter().position(|e| &e.video_id == video_id)?;
        Some(self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(history: History) -> Self {
        history.entries
    }
}
