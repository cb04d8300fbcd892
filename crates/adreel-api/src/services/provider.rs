//! Analysis provider abstraction.

use async_trait::async_trait;
use serde_json::Value;

use adreel_models::{StatusUpdate, VideoSource};

use crate::error::ApiResult;

/// One observation of a provider task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    /// Status mapped onto the video lifecycle
    pub update: StatusUpdate,
    /// Provider-side video handle, known once indexing has started
    pub video_ref: Option<String>,
}

impl TaskSnapshot {
    pub fn new(update: StatusUpdate) -> Self {
        Self {
            update,
            video_ref: None,
        }
    }

    pub fn with_video_ref(mut self, video_ref: impl Into<String>) -> Self {
        self.video_ref = Some(video_ref.into());
        self
    }
}

/// A backend that analyzes submitted videos.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Display name, used in status messages and health output.
    fn name(&self) -> &'static str;

    /// Whether submissions can succeed with the current configuration.
    fn is_configured(&self) -> bool;

    /// Submit a video for analysis. Returns the provider task id.
    async fn submit(&self, source: &VideoSource) -> ApiResult<String>;

    /// Observe the current state of a task.
    async fn poll(&self, task_id: &str) -> ApiResult<TaskSnapshot>;

    /// Fetch the analysis payload for a finished video.
    async fn fetch_analysis(&self, video_ref: &str) -> ApiResult<Value>;
}
