//! Edit generation handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use adreel_models::{plan_edit, scenes_from_analysis, EditJobId, EditPlan, EditRequest, EditResponse, VideoStatus};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// `POST /api/edits`: lay out ad cuts for a completed video.
pub async fn create_edit(
    State(state): State<AppState>,
    Json(request): Json<EditRequest>,
) -> ApiResult<(StatusCode, Json<EditResponse>)> {
    let record = state
        .videos
        .get(&request.video_id)
        .await
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    if record.status != VideoStatus::Completed {
        return Err(ApiError::bad_request("Video analysis not yet complete"));
    }

    let timeline = match record.timeline {
        Some(timeline) => timeline,
        None => record
            .analysis
            .as_ref()
            .map(scenes_from_analysis)
            .unwrap_or_default(),
    };
    if timeline.is_empty() {
        return Err(ApiError::bad_request("No scenes available for this video"));
    }

    let plan = plan_edit(&request, &timeline)?;

    info!(
        job_id = %plan.job_id,
        video_id = %plan.video_id,
        files = plan.files.len(),
        template = request.template_id.as_deref().unwrap_or("custom"),
        "Edit job planned"
    );
    metrics::record_edit_planned(plan.files.len());

    state.edits.insert(plan.clone()).await;
    Ok((StatusCode::ACCEPTED, Json(EditResponse::from(plan))))
}

/// `GET /api/edits/:job_id`
pub async fn get_edit(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<EditPlan>> {
    state
        .edits
        .get(&EditJobId(job_id))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Edit job not found"))
}
