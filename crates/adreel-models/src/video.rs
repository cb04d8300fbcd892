//! Video record models.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::scene::Scene;

/// Identifier handed back to the front end after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new `vid_xxxxxxxx` identifier.
    pub fn new() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("vid_{}", &hex[..8]))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Video processing status.
///
/// The lifecycle is linear (`uploading -> processing -> indexing -> completed`),
/// with `error` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Bytes are still being sent to the relay
    #[default]
    Uploading,
    /// Submitted to the provider, waiting for a worker
    Processing,
    /// Provider is indexing the video content
    Indexing,
    /// Analysis is available
    Completed,
    /// Upload or analysis failed
    Error,
}

impl VideoStatus {
    pub const ALL: &'static [VideoStatus] = &[
        VideoStatus::Uploading,
        VideoStatus::Processing,
        VideoStatus::Indexing,
        VideoStatus::Completed,
        VideoStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Uploading => "uploading",
            VideoStatus::Processing => "processing",
            VideoStatus::Indexing => "indexing",
            VideoStatus::Completed => "completed",
            VideoStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state (polling stops here).
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Error)
    }

    /// Position in the linear lifecycle. `Error` sits outside it.
    pub fn rank(&self) -> Option<u8> {
        match self {
            VideoStatus::Uploading => Some(0),
            VideoStatus::Processing => Some(1),
            VideoStatus::Indexing => Some(2),
            VideoStatus::Completed => Some(3),
            VideoStatus::Error => None,
        }
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_transition_to(&self, next: VideoStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(current), Some(target)) => target > current,
            (None, Some(_)) => false,
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = VideoStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uploading" => Ok(VideoStatus::Uploading),
            "processing" => Ok(VideoStatus::Processing),
            "indexing" => Ok(VideoStatus::Indexing),
            "completed" => Ok(VideoStatus::Completed),
            "error" => Ok(VideoStatus::Error),
            _ => Err(VideoStatusParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown video status: {0}")]
pub struct VideoStatusParseError(String);

/// A status observation to fold into a [`VideoRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: VideoStatus,
    pub progress: u8,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: VideoStatus, progress: u8, message: impl Into<String>) -> Self {
        Self {
            status,
            progress: progress.min(100),
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// What the user submitted.
#[derive(Debug, Clone)]
pub enum VideoSource {
    File {
        filename: String,
        content_type: Option<String>,
        bytes: Bytes,
    },
    Url(String),
}

impl VideoSource {
    /// Short label for logs and history.
    pub fn label(&self) -> &str {
        match self {
            VideoSource::File { filename, .. } => filename,
            VideoSource::Url(url) => url,
        }
    }
}

/// A video tracked by the relay.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoRecord {
    pub id: VideoId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub status: VideoStatus,

    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Provider task handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Raw provider analysis payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<Scene>>,
}

impl VideoRecord {
    /// Create a record for a freshly submitted source.
    pub fn new(id: VideoId, source: &VideoSource) -> Self {
        let (filename, url) = match source {
            VideoSource::File { filename, .. } => (Some(filename.clone()), None),
            VideoSource::Url(url) => (None, Some(url.clone())),
        };

        Self {
            id,
            filename,
            url,
            status: VideoStatus::Uploading,
            progress: 0,
            message: None,
            error: None,
            created_at: Utc::now(),
            task_id: None,
            analysis: None,
            timeline: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Fold a status observation into the record.
    ///
    /// Returns `false` and leaves the record untouched when the update would
    /// move the status backwards.
    pub fn apply(&mut self, update: StatusUpdate) -> bool {
        if !self.status.can_transition_to(update.status) {
            return false;
        }

        self.progress = match update.status {
            VideoStatus::Error => 0,
            VideoStatus::Completed => 100,
            _ => update.progress.min(100).max(self.progress),
        };
        self.status = update.status;
        self.message = Some(update.message);
        if update.error.is_some() {
            self.error = update.error;
        }
        true
    }

    /// Mark as failed.
    pub fn fail(&mut self, error: impl Into<String>) {
        let error = error.into();
        self.apply(StatusUpdate::new(VideoStatus::Error, 0, "Analysis failed").with_error(error));
    }
}
