//! Provider task states and their mapping onto the AdReel lifecycle.

use std::fmt;

use adreel_models::{StatusUpdate, VideoStatus};

/// Task state as reported by TwelveLabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Indexing,
    Ready,
    Failed,
    /// Any state this client does not know about (`validating`, `queued`, ...)
    Other(String),
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => TaskStatus::Pending,
            "indexing" => TaskStatus::Indexing,
            "ready" => TaskStatus::Ready,
            "failed" => TaskStatus::Failed,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Indexing => write!(f, "indexing"),
            TaskStatus::Ready => write!(f, "ready"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Translate a provider task state into a status update for the record.
pub fn map_task_status(status: &TaskStatus) -> StatusUpdate {
    match status {
        TaskStatus::Pending => {
            StatusUpdate::new(VideoStatus::Processing, 25, "Video queued for processing")
        }
        TaskStatus::Indexing => {
            StatusUpdate::new(VideoStatus::Indexing, 50, "Analyzing video content")
        }
        TaskStatus::Ready => StatusUpdate::new(VideoStatus::Completed, 100, "Analysis complete"),
        TaskStatus::Failed => StatusUpdate::new(VideoStatus::Error, 0, "Analysis failed"),
        TaskStatus::Other(s) => StatusUpdate::new(
            VideoStatus::Processing,
            35,
            format!("Processing (TL status: {})", s),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        let cases = [
            ("pending", VideoStatus::Processing, 25),
            ("indexing", VideoStatus::Indexing, 50),
            ("ready", VideoStatus::Completed, 100),
            ("failed", VideoStatus::Error, 0),
            ("validating", VideoStatus::Processing, 35),
        ];

        for (raw, status, progress) in cases {
            let update = map_task_status(&TaskStatus::from(raw));
            assert_eq!(update.status, status, "status for {}", raw);
            assert_eq!(update.progress, progress, "progress for {}", raw);
        }
    }

    #[test]
    fn test_unknown_status_message_names_provider_state() {
        let update = map_task_status(&TaskStatus::from("validating"));
        assert_eq!(update.message, "Processing (TL status: validating)");
        assert_eq!(TaskStatus::from("validating").to_string(), "validating");
    }
}
