//! TwelveLabs-backed analysis provider.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use adreel_models::VideoSource;
use adreel_twelvelabs::{map_task_status, TaskStatus, TwelveLabsClient};

use crate::error::{ApiError, ApiResult};
use crate::services::provider::{AnalysisProvider, TaskSnapshot};

const MISSING_INDEX: &str = "Create your TwelveLabs index once and set TL_INDEX_ID in .env";
const MISSING_KEY: &str = "TL_API_KEY is not set; add it to .env.local";

/// Relays submissions and status checks to TwelveLabs.
pub struct TwelveLabsProvider {
    client: Option<TwelveLabsClient>,
}

impl TwelveLabsProvider {
    pub fn new(client: TwelveLabsClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Build from environment variables. A missing API key leaves the
    /// provider unconfigured rather than failing startup.
    pub fn from_env() -> Self {
        match TwelveLabsClient::from_env() {
            Ok(client) => {
                if client.index_id().is_none() {
                    warn!("TL_INDEX_ID is not set; run create-index before submitting videos");
                }
                Self::new(client)
            }
            Err(e) => {
                warn!("TwelveLabs client unavailable: {}", e);
                Self { client: None }
            }
        }
    }

    fn client(&self) -> ApiResult<&TwelveLabsClient> {
        self.client
            .as_ref()
            .ok_or_else(|| ApiError::configuration(MISSING_KEY))
    }
}

#[async_trait]
impl AnalysisProvider for TwelveLabsProvider {
    fn name(&self) -> &'static str {
        "TwelveLabs"
    }

    fn is_configured(&self) -> bool {
        self.client
            .as_ref()
            .map(|c| c.config().is_fully_configured())
            .unwrap_or(false)
    }

    async fn submit(&self, source: &VideoSource) -> ApiResult<String> {
        let client = self.client()?;
        let index_id = client
            .index_id()
            .ok_or_else(|| ApiError::configuration(MISSING_INDEX))?;

        let task_id = match source {
            VideoSource::Url(url) => client.create_task_from_url(index_id, url).await?,
            VideoSource::File {
                filename,
                content_type,
                bytes,
            } => {
                client
                    .create_task_from_file(index_id, filename, content_type.as_deref(), bytes.clone())
                    .await?
            }
        };

        info!(task_id = %task_id, source = %source.label(), "Submitted video to TwelveLabs");
        Ok(task_id)
    }

    async fn poll(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        let (status, task) = self.client()?.get_task_status(task_id).await?;

        let mut update = map_task_status(&status);
        if status == TaskStatus::Failed {
            update = update.with_error(
                task.error_message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            );
        }

        let mut snapshot = TaskSnapshot::new(update);
        if let Some(video_id) = task.video_id {
            snapshot = snapshot.with_video_ref(video_id);
        }
        Ok(snapshot)
    }

    async fn fetch_analysis(&self, video_ref: &str) -> ApiResult<Value> {
        let client = self.client()?;
        let mut analysis = client.get_video(client.index_id(), video_ref).await?;
        let chapters = Value::Array(client.summarize_chapters(video_ref).await?);

        match analysis.as_object_mut() {
            Some(fields) => {
                fields.insert("chapters".to_string(), chapters);
            }
            None => analysis = json!({ "video": analysis, "chapters": chapters }),
        }
        Ok(analysis)
    }
}

impl From<TwelveLabsClient> for TwelveLabsProvider {
    fn from(client: TwelveLabsClient) -> Self {
        Self::new(client)
    }
}

impl std::fmt::Debug for TwelveLabsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwelveLabsProvider")
            .field("configured", &self.is_configured())
            .finish()
    }
}
