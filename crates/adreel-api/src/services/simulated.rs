//! Timer-driven analysis provider for demos and offline development.
//!
//! Each submitted task walks `processing -> indexing -> completed`, one stage
//! per configured step. Sources whose name mentions "fail" end in `error`
//! instead, which makes the failure path easy to exercise by hand.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use adreel_models::{Scene, Sentiment, StatusUpdate, VideoSource, VideoStatus};

use crate::error::{ApiError, ApiResult};
use crate::services::provider::{AnalysisProvider, TaskSnapshot};

#[derive(Debug, Clone)]
struct SimulatedTask {
    submitted_at: Instant,
    label: String,
    fails: bool,
}

/// In-process stand-in for the analysis backend.
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    step: Duration,
    tasks: Arc<RwLock<HashMap<String, SimulatedTask>>>,
}

impl SimulatedProvider {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn stage(&self, elapsed: Duration) -> u128 {
        if self.step.is_zero() {
            return 2;
        }
        elapsed.as_millis() / self.step.as_millis()
    }

    fn snapshot(&self, task_id: &str, task: &SimulatedTask) -> TaskSnapshot {
        let stage = self.stage(task.submitted_at.elapsed());

        let update = match stage {
            0 => StatusUpdate::new(VideoStatus::Processing, 25, "Video queued for processing"),
            _ if task.fails => StatusUpdate::new(VideoStatus::Error, 0, "Analysis failed")
                .with_error(format!("Simulated failure for {}", task.label)),
            1 => StatusUpdate::new(VideoStatus::Indexing, 50, "Analyzing video content"),
            _ => StatusUpdate::new(VideoStatus::Completed, 100, "Analysis complete"),
        };

        let snapshot = TaskSnapshot::new(update);
        if stage >= 1 {
            snapshot.with_video_ref(task_id)
        } else {
            snapshot
        }
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

/// Scene timeline handed out for every simulated video.
fn synthetic_timeline(label: &str) -> Vec<Scene> {
    vec![
        Scene::new(1, 0.0, 4.5)
            .with_transcript(format!("Opening shot of {}", label))
            .with_tags(["intro", "logo"]),
        Scene::new(2, 4.5, 11.0)
            .with_transcript("A customer struggles with the old way of doing things")
            .with_tags(["problem"])
            .with_sentiment(Sentiment::Negative),
        Scene::new(3, 11.0, 19.5)
            .with_transcript("The product shows up and everyone smiles")
            .with_tags(["product", "reveal"])
            .with_sentiment(Sentiment::Positive),
        Scene::new(4, 19.5, 26.0)
            .with_transcript("Close-up feature walkthrough")
            .with_tags(["feature"]),
        Scene::new(5, 26.0, 30.0)
            .with_transcript("Call to action with the brand tagline")
            .with_tags(["cta", "logo"])
            .with_sentiment(Sentiment::Positive),
    ]
}

#[async_trait]
impl AnalysisProvider for SimulatedProvider {
    fn name(&self) -> &'static str {
        "the simulated analyzer"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn submit(&self, source: &VideoSource) -> ApiResult<String> {
        let task_id = format!("sim_{}", Uuid::new_v4().simple());
        let label = source.label().to_string();
        let fails = label.to_lowercase().contains("fail");

        debug!(task_id = %task_id, source = %label, fails, "Simulated task submitted");

        self.tasks.write().await.insert(
            task_id.clone(),
            SimulatedTask {
                submitted_at: Instant::now(),
                label,
                fails,
            },
        );
        Ok(task_id)
    }

    async fn poll(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        let tasks = self.tasks.read().await;
        let task = tasks
            .get(task_id)
            .ok_or_else(|| ApiError::not_found(format!("Unknown task: {}", task_id)))?;
        Ok(self.snapshot(task_id, task))
    }

    async fn fetch_analysis(&self, video_ref: &str) -> ApiResult<Value> {
        let tasks = self.tasks.read().await;
        let task = tasks
            .get(video_ref)
            .ok_or_else(|| ApiError::not_found(format!("Unknown video: {}", video_ref)))?;

        Ok(json!({
            "_id": video_ref,
            "source": task.label,
            "system_metadata": { "duration": 30.0 },
            "scenes": synthetic_timeline(&task.label),
        }))
    }
}
