//! Video submission and status handlers.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use adreel_models::{
    check_file_size, format_bytes, scenes_from_analysis, validate_url, validate_video_filename, Scene,
    SizeCheck, StatusUpdate, ValidationError, VideoId, VideoRecord, VideoSource, VideoStatus,
};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "videoId")]
    pub video_id: VideoId,
}

/// Current status of a video as seen by the front end.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub id: VideoId,
    pub status: VideoStatus,
    pub progress: u8,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
}

impl From<&VideoRecord> for StatusResponse {
    fn from(record: &VideoRecord) -> Self {
        Self {
            id: record.id.clone(),
            status: record.status,
            progress: record.progress,
            message: record.message.clone().unwrap_or_default(),
            error: record.error.clone(),
            task_id: record.task_id.clone(),
            analysis: record.analysis.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoDetailsResponse {
    #[serde(rename = "videoId")]
    pub video_id: VideoId,
    pub status: VideoStatus,
    pub analysis: Option<Value>,
    pub task_id: Option<String>,
    pub scenes: Vec<Scene>,
}

/// List entry; leaves out the analysis payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: VideoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: VideoStatus,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRecord> for VideoSummary {
    fn from(record: VideoRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename,
            url: record.url,
            status: record.status,
            progress: record.progress,
            message: record.message,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListVideosQuery {
    pub status: Option<String>,
}

// =============================================================================
// Upload
// =============================================================================

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Pull the submitted source out of the form. A URL wins over a file.
async fn read_source(multipart: &mut Multipart) -> ApiResult<VideoSource> {
    let mut file = None;
    let mut url = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string).unwrap_or_default();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file was picked
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                file = Some(VideoSource::File {
                    filename: if filename.is_empty() { "upload.mp4".to_string() } else { filename },
                    content_type,
                    bytes,
                });
            }
            Some("url") => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    url = Some(VideoSource::Url(text.trim().to_string()));
                }
            }
            other => debug!(field = ?other, "Ignoring unknown upload field"),
        }
    }

    url.or(file)
        .ok_or_else(|| ApiError::bad_request("Provide either file or url"))
}

fn validate_source(source: &VideoSource) -> ApiResult<()> {
    match source {
        VideoSource::Url(url) => {
            validate_url(url)?;
        }
        VideoSource::File {
            filename,
            content_type,
            bytes,
        } => {
            if bytes.is_empty() {
                return Err(ValidationError::EmptyFile.into());
            }

            let is_video_mime = content_type
                .as_deref()
                .map_or(false, |ct| ct.starts_with("video/"));
            if !is_video_mime {
                validate_video_filename(filename)?;
            }

            let size = bytes.len() as u64;
            if check_file_size(size).into_result(size)? == SizeCheck::Warning {
                warn!(filename = %filename, size = %format_bytes(size), "Large upload accepted");
            }
        }
    }
    Ok(())
}

/// `POST /api/videos`: accept a file or URL and hand it to the provider.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let source = read_source(&mut multipart).await?;
    validate_source(&source)?;

    let task_id = state.provider.submit(&source).await?;

    let video_id = VideoId::new();
    let mut record = VideoRecord::new(video_id.clone(), &source);
    record.apply(StatusUpdate::new(
        VideoStatus::Processing,
        10,
        format!("Video submitted to {} for analysis", state.provider.name()),
    ));
    record.task_id = Some(task_id.clone());
    state.videos.insert(record).await;

    let kind = match source {
        VideoSource::File { .. } => "file",
        VideoSource::Url(_) => "url",
    };
    metrics::record_video_submitted(kind);
    info!(video_id = %video_id, task_id = %task_id, source = kind, "Video submitted");

    Ok(Json(UploadResponse { video_id }))
}

// =============================================================================
// Status
// =============================================================================

/// `GET /api/videos/:id/status`: refresh from the provider and report.
pub async fn get_video_status(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let video_id = VideoId::from(video_id);
    let record = state
        .videos
        .get(&video_id)
        .await
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    // Settled records need no provider round-trip
    let settled = record.status == VideoStatus::Error
        || (record.status == VideoStatus::Completed && record.analysis.is_some());
    let task_id = match (&record.task_id, settled) {
        (Some(task_id), false) => task_id.clone(),
        _ => {
            metrics::record_status_check("cached");
            return Ok(Json(StatusResponse::from(&record)));
        }
    };

    let snapshot = match state.provider.poll(&task_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(video_id = %video_id, task_id = %task_id, error = %e, "Status check failed");
            metrics::record_status_check("failed");
            let mut response = StatusResponse::from(&record);
            response.message = format!("Status check failed: {}", e);
            return Ok(Json(response));
        }
    };

    let analysis = match (&snapshot.update.status, &snapshot.video_ref, &record.analysis) {
        (VideoStatus::Completed, Some(video_ref), None) => {
            match state.provider.fetch_analysis(video_ref).await {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    warn!(video_id = %video_id, error = %e, "Could not fetch analysis details");
                    None
                }
            }
        }
        _ => None,
    };

    let updated = state
        .videos
        .update(&video_id, |r| {
            let status = snapshot.update.status;
            if !r.apply(snapshot.update) {
                debug!(video_id = %r.id, current = %r.status, reported = %status, "Ignoring backwards status");
            }
            if let Some(analysis) = analysis {
                r.timeline = Some(scenes_from_analysis(&analysis));
                r.analysis = Some(analysis);
            }
        })
        .await
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    metrics::record_status_check("polled");
    Ok(Json(StatusResponse::from(&updated)))
}

// =============================================================================
// Details and listing
// =============================================================================

/// `GET /api/videos/:id`: analysis results for a completed video.
pub async fn get_video_details(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<VideoDetailsResponse>> {
    let record = state
        .videos
        .get(&VideoId::from(video_id))
        .await
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    if record.status != VideoStatus::Completed {
        return Err(ApiError::bad_request("Video analysis not yet complete"));
    }

    let scenes = match record.timeline {
        Some(timeline) => timeline,
        None => record
            .analysis
            .as_ref()
            .map(scenes_from_analysis)
            .unwrap_or_default(),
    };

    Ok(Json(VideoDetailsResponse {
        video_id: record.id,
        status: record.status,
        analysis: record.analysis,
        task_id: record.task_id,
        scenes,
    }))
}

/// `GET /api/videos?status=`: known videos, newest first.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ListVideosQuery>,
) -> ApiResult<Json<Vec<VideoSummary>>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<VideoStatus>)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let videos = state
        .videos
        .list(status)
        .await
        .into_iter()
        .map(VideoSummary::from)
        .collect();

    Ok(Json(videos))
}
