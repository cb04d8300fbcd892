//! HTTP client for the AdReel relay.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use adreel_models::{
    check_file_size, validate_url, validate_video_filename, EditRequest, EditResponse, Scene, SizeCheck,
    Template, ValidationError, VideoId, VideoStatus,
};

use crate::error::{ClientError, ClientResult};

/// Relay address used when none is given.
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// Status payload from `GET /api/videos/:id/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusView {
    pub id: VideoId,
    pub status: VideoStatus,
    pub progress: u8,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Details payload from `GET /api/videos/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsView {
    #[serde(rename = "videoId")]
    pub video_id: VideoId,
    pub status: VideoStatus,
    #[serde(default)]
    pub analysis: Option<Value>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "videoId")]
    video_id: VideoId,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Check a local file before any bytes are sent.
pub fn check_local_file(path: &Path, size: u64) -> ClientResult<SizeCheck> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ClientError::usage(format!("Not a file path: {}", path.display())))?;

    validate_video_filename(filename)?;
    if size == 0 {
        return Err(ValidationError::EmptyFile.into());
    }
    Ok(check_file_size(size).into_result(size)?)
}

fn guess_content_type(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "m4v" => "video/x-m4v",
        _ => "video/mp4",
    }
}

/// Client for the relay's REST API.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("adreel-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Submit a video by URL.
    pub async fn upload_url(&self, url: &str) -> ClientResult<VideoId> {
        let url = validate_url(url)?;
        let form = Form::new().text("url", url.to_string());
        self.submit(form).await
    }

    /// Upload a local file. Size and extension are checked first.
    pub async fn upload_file(&self, path: &Path) -> ClientResult<VideoId> {
        let size = tokio::fs::metadata(path).await?.len();
        check_local_file(path, size)?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.mp4")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str(guess_content_type(&filename))?;

        self.submit(Form::new().part("file", part)).await
    }

    async fn submit(&self, form: Form) -> ClientResult<VideoId> {
        let response = self
            .http
            .post(self.url("api/videos"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = Self::parse(response).await?;
        Ok(body.video_id)
    }

    pub async fn status(&self, video_id: &VideoId) -> ClientResult<StatusView> {
        let response = self
            .http
            .get(self.url(&format!("api/videos/{}/status", video_id)))
            .timeout(Duration::from_secs(30))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn details(&self, video_id: &VideoId) -> ClientResult<DetailsView> {
        let response = self
            .http
            .get(self.url(&format!("api/videos/{}", video_id)))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn templates(&self) -> ClientResult<Vec<Template>> {
        let response = self.http.get(self.url("api/templates")).send().await?;
        Self::parse(response).await
    }

    pub async fn create_edit(&self, request: &EditRequest) -> ClientResult<EditResponse> {
        let response = self
            .http
            .post(self.url("api/edits"))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Relay responded");

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(ClientError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
