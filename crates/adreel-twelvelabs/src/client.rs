//! TwelveLabs REST API client.
//!
//! Thin wrapper over reqwest with:
//! - API key header on every request
//! - Per-operation timeouts (uploads get longer than lookups)
//! - Tracing spans and request metrics
//!
//! There is no retry here: a failed call is reported to the caller, which
//! decides whether to fall back to cached state.

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info_span, Instrument};

use crate::error::{TwelveLabsError, TwelveLabsResult};
use crate::metrics::{record_request, record_upload_bytes};
use crate::status::TaskStatus;
use crate::types::{
    ChapterSummary, CreateIndexRequest, IndexList, IndexSummary, SummarizeRequest, Task, TaskCreated,
};

/// Production API base.
pub const DEFAULT_API_BASE: &str = "https://api.twelvelabs.io/v1.3";

// =============================================================================
// Configuration
// =============================================================================

/// TwelveLabs client configuration.
#[derive(Debug, Clone)]
pub struct TwelveLabsConfig {
    /// Value of the `x-api-key` header
    pub api_key: String,
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Index new videos are submitted to
    pub index_id: Option<String>,
    /// Timeout for task submission (uploads)
    pub upload_timeout: Duration,
    /// Timeout for lookups
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl TwelveLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            index_id: None,
            upload_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_index_id(mut self, index_id: impl Into<String>) -> Self {
        self.index_id = Some(index_id.into());
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> TwelveLabsResult<Self> {
        let api_key = std::env::var("TL_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TwelveLabsError::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Ok(base) = std::env::var("TL_API_BASE") {
            if !base.trim().is_empty() {
                config = config.with_base_url(base.trim());
            }
        }

        config.index_id = std::env::var("TL_INDEX_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if let Some(secs) = std::env::var("TL_UPLOAD_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.upload_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Whether both credentials and an index are present.
    pub fn is_fully_configured(&self) -> bool {
        !self.api_key.is_empty() && self.index_id.is_some()
    }
}

// =============================================================================
// Client
// =============================================================================

/// TwelveLabs REST API client.
#[derive(Clone)]
pub struct TwelveLabsClient {
    http: Client,
    config: TwelveLabsConfig,
}

impl TwelveLabsClient {
    /// Create a new client.
    pub fn new(config: TwelveLabsConfig) -> TwelveLabsResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("adreel-twelvelabs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TwelveLabsError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> TwelveLabsResult<Self> {
        Self::new(TwelveLabsConfig::from_env()?)
    }

    pub fn config(&self) -> &TwelveLabsConfig {
        &self.config
    }

    pub fn index_id(&self) -> Option<&str> {
        self.config.index_id.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("x-api-key", &self.config.api_key)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Submit a video by URL. Returns the provider task id.
    pub async fn create_task_from_url(&self, index_id: &str, video_url: &str) -> TwelveLabsResult<String> {
        // The tasks endpoint only takes multipart, even without a file.
        let form = Form::new()
            .text("index_id", index_id.to_string())
            .text("video_url", video_url.to_string());

        let request = self
            .authorized(self.http.post(self.url("tasks")))
            .multipart(form)
            .timeout(self.config.upload_timeout);

        let created: TaskCreated = self.execute_json("create_task_url", request).await?;
        Self::task_id_of(created)
    }

    /// Upload raw file bytes. Returns the provider task id.
    pub async fn create_task_from_file(
        &self,
        index_id: &str,
        filename: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> TwelveLabsResult<String> {
        let size = bytes.len() as u64;
        let mut part = Part::stream_with_length(bytes, size).file_name(filename.to_string());
        if let Some(ct) = content_type {
            part = part.mime_str(ct)?;
        }

        let form = Form::new()
            .text("index_id", index_id.to_string())
            .part("file", part);

        let request = self
            .authorized(self.http.post(self.url("tasks")))
            .multipart(form)
            .timeout(self.config.upload_timeout);

        let created: TaskCreated = self.execute_json("create_task_file", request).await?;
        record_upload_bytes(size);
        Self::task_id_of(created)
    }

    fn task_id_of(created: TaskCreated) -> TwelveLabsResult<String> {
        created
            .task_id()
            .map(str::to_string)
            .ok_or_else(|| TwelveLabsError::invalid_response("task response carried no id"))
    }

    /// Look up a task.
    pub async fn get_task(&self, task_id: &str) -> TwelveLabsResult<Task> {
        let request = self
            .authorized(self.http.get(self.url(&format!("tasks/{}", task_id))))
            .timeout(self.config.request_timeout);

        self.execute_json("get_task", request).await
    }

    /// Look up a task and return its parsed state alongside the raw record.
    pub async fn get_task_status(&self, task_id: &str) -> TwelveLabsResult<(TaskStatus, Task)> {
        let task = self.get_task(task_id).await?;
        Ok((TaskStatus::from(task.status.as_str()), task))
    }

    // =========================================================================
    // Videos
    // =========================================================================

    /// Fetch the indexed video details (opaque analysis payload).
    pub async fn get_video(&self, index_id: Option<&str>, video_id: &str) -> TwelveLabsResult<serde_json::Value> {
        let path = match index_id {
            Some(index) => format!("indexes/{}/videos/{}", index, video_id),
            None => format!("videos/{}", video_id),
        };
        let request = self
            .authorized(self.http.get(self.url(&path)))
            .timeout(self.config.request_timeout);

        self.execute_json("get_video", request).await
    }

    /// Generate chapter summaries for an indexed video.
    ///
    /// The video lookup only returns metadata; scene boundaries come from here.
    pub async fn summarize_chapters(&self, video_id: &str) -> TwelveLabsResult<Vec<serde_json::Value>> {
        let request = self
            .authorized(self.http.post(self.url("summarize")))
            .json(&SummarizeRequest::chapters(video_id))
            .timeout(self.config.upload_timeout);

        let summary: ChapterSummary = self.execute_json("summarize_chapters", request).await?;
        Ok(summary.chapters)
    }

    // =========================================================================
    // Indexes
    // =========================================================================

    /// List the indexes visible to this API key.
    pub async fn list_indexes(&self) -> TwelveLabsResult<Vec<IndexSummary>> {
        let request = self
            .authorized(self.http.get(self.url("indexes")))
            .timeout(self.config.request_timeout);

        let list: IndexList = self.execute_json("list_indexes", request).await?;
        Ok(list.data)
    }

    /// Create an index. Returns the new index.
    pub async fn create_index(&self, body: &CreateIndexRequest) -> TwelveLabsResult<IndexSummary> {
        let request = self
            .authorized(self.http.post(self.url("indexes")))
            .json(body)
            .timeout(self.config.upload_timeout);

        self.execute_json("create_index", request).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> TwelveLabsResult<T> {
        let span = info_span!("twelvelabs_request", operation = %operation);
        let start = Instant::now();

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            debug!(status = %status, "TwelveLabs responded");

            if !status.is_success() {
                return Err(Self::handle_error_response(status, response).await);
            }

            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(|e| {
                TwelveLabsError::invalid_response(format!("{}: {}", operation, e))
            })
        }
        .instrument(span)
        .await;

        let latency_ms = start.elapsed().as_millis() as f64;
        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> TwelveLabsError {
        let body = response.text().await.unwrap_or_default();
        TwelveLabsError::from_http_status(status.as_u16(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_requires_api_key() {
        std::env::remove_var("TL_API_KEY");
        assert!(matches!(
            TwelveLabsConfig::from_env(),
            Err(TwelveLabsError::MissingApiKey)
        ));

        std::env::set_var("TL_API_KEY", "   ");
        assert!(TwelveLabsConfig::from_env().is_err());
        std::env::remove_var("TL_API_KEY");
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        std::env::set_var("TL_API_KEY", "tlk_test");
        std::env::remove_var("TL_API_BASE");
        std::env::remove_var("TL_INDEX_ID");
        std::env::remove_var("TL_UPLOAD_TIMEOUT_SECS");

        let config = TwelveLabsConfig::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert_eq!(config.index_id, None);
        assert_eq!(config.upload_timeout, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.is_fully_configured());

        std::env::remove_var("TL_API_KEY");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = TwelveLabsConfig::new("k").with_base_url("http://localhost:9000/v1.3/");
        let client = TwelveLabsClient::new(config).unwrap();
        assert_eq!(client.url("/tasks"), "http://localhost:9000/v1.3/tasks");
    }
}
