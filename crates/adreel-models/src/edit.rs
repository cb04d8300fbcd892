//! Edit-generation requests and output planning.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::scene::{Scene, SceneId};
use crate::template::{AspectRatio, CaptionStyle, Template};
use crate::video::VideoId;

/// Longest cut a template may ask for, in seconds.
pub const MAX_EDIT_DURATION_SECS: u32 = 180;

/// Identifier of an edit-generation job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EditJobId(pub String);

impl EditJobId {
    pub fn new() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("edit_{}", &hex[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EditJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EditJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request to assemble selected scenes into ad cuts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditRequest {
    pub video_id: VideoId,

    /// Scenes to include, any order
    pub scene_ids: Vec<SceneId>,

    pub aspect_ratios: Vec<AspectRatio>,

    /// Target durations in seconds
    pub durations: Vec<u32>,

    #[serde(default)]
    pub caption_style: CaptionStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl EditRequest {
    /// Build a request that follows a template preset.
    pub fn from_template(video_id: VideoId, scene_ids: Vec<SceneId>, template: &Template) -> Self {
        Self {
            video_id,
            scene_ids,
            aspect_ratios: template.aspect_ratios.clone(),
            durations: template.durations.clone(),
            caption_style: template.caption_style,
            template_id: Some(template.id.clone()),
        }
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), String> {
        if self.scene_ids.is_empty() {
            return Err("At least one scene must be selected".to_string());
        }

        if self.aspect_ratios.is_empty() {
            return Err("At least one aspect ratio must be specified".to_string());
        }

        if let Some(bad) = self
            .aspect_ratios
            .iter()
            .find(|r| !AspectRatio::SUPPORTED.contains(r))
        {
            return Err(format!("Unsupported aspect ratio: {}", bad));
        }

        if self.durations.is_empty() {
            return Err("At least one duration must be specified".to_string());
        }

        if let Some(bad) = self
            .durations
            .iter()
            .find(|d| **d == 0 || **d > MAX_EDIT_DURATION_SECS)
        {
            return Err(format!(
                "Duration {}s is out of range (1-{}s)",
                bad, MAX_EDIT_DURATION_SECS
            ));
        }

        Ok(())
    }

    /// Number of files the job will produce.
    pub fn total_outputs(&self) -> usize {
        self.aspect_ratios.len() * self.durations.len()
    }
}

/// A slice of the source video used in one output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EditSegment {
    pub scene_id: SceneId,
    pub start: f64,
    pub end: f64,
}

/// One planned output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedFile {
    pub aspect_ratio: AspectRatio,
    /// Target duration in seconds
    pub duration: u32,
    /// Running time of the planned segments
    pub actual_duration: f64,
    pub scene_ids: Vec<SceneId>,
    pub segments: Vec<EditSegment>,
    pub path: String,
}

/// Result of planning an edit job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EditPlan {
    pub job_id: EditJobId,
    pub video_id: VideoId,
    pub caption_style: CaptionStyle,
    pub files: Vec<GeneratedFile>,
}

/// Response returned by the edit-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditResponse {
    pub job_id: EditJobId,
    pub status: String,
    pub files: Vec<GeneratedFile>,
}

impl From<EditPlan> for EditResponse {
    fn from(plan: EditPlan) -> Self {
        Self {
            job_id: plan.job_id,
            status: "queued".to_string(),
            files: plan.files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("Invalid edit request: {0}")]
    Invalid(String),

    #[error("Unknown scene id: {0}")]
    UnknownScene(SceneId),

    #[error("Selected scenes have no running time")]
    EmptySelection,
}

/// Lay out the output files for an edit request.
///
/// Scenes are used in timeline order; each output is trimmed so its running
/// time never exceeds the target duration.
pub fn plan_edit(request: &EditRequest, timeline: &[Scene]) -> Result<EditPlan, EditError> {
    request.validate().map_err(EditError::Invalid)?;

    if let Some(missing) = request
        .scene_ids
        .iter()
        .find(|id| !timeline.iter().any(|s| s.id == **id))
    {
        return Err(EditError::UnknownScene(*missing));
    }

    let selected: Vec<&Scene> = timeline
        .iter()
        .filter(|s| request.scene_ids.contains(&s.id))
        .collect();

    if selected.iter().all(|s| s.duration() <= 0.0) {
        return Err(EditError::EmptySelection);
    }

    let job_id = EditJobId::new();
    let mut files = Vec::with_capacity(request.total_outputs());

    for ratio in &request.aspect_ratios {
        for &duration in &request.durations {
            let segments = fit_segments(&selected, duration as f64);
            let actual_duration = segments.iter().map(|s| s.end - s.start).sum();
            let scene_ids = segments.iter().map(|s| s.scene_id).collect();

            files.push(GeneratedFile {
                aspect_ratio: *ratio,
                duration,
                actual_duration,
                scene_ids,
                segments,
                path: format!(
                    "{}/{}/{}_{}s.mp4",
                    request.video_id,
                    job_id,
                    ratio.slug(),
                    duration
                ),
            });
        }
    }

    Ok(EditPlan {
        job_id,
        video_id: request.video_id.clone(),
        caption_style: request.caption_style,
        files,
    })
}

fn fit_segments(scenes: &[&Scene], target: f64) -> Vec<EditSegment> {
    let mut remaining = target;
    let mut segments = Vec::new();

    for scene in scenes {
        if remaining <= 0.0 {
            break;
        }
        let length = scene.duration().min(remaining);
        if length <= 0.0 {
            continue;
        }
        segments.push(EditSegment {
            scene_id: scene.id,
            start: scene.start,
            end: scene.start + length,
        });
        remaining -= length;
    }

    segments
}
