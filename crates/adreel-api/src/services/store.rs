//! In-memory record stores.
//!
//! Records live for the lifetime of the process; nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use adreel_models::{EditJobId, EditPlan, VideoId, VideoRecord, VideoStatus};

/// Video records keyed by id.
#[derive(Debug, Clone, Default)]
pub struct VideoStore {
    records: Arc<RwLock<HashMap<VideoId, VideoRecord>>>,
}

impl VideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: VideoRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }

    pub async fn get(&self, id: &VideoId) -> Option<VideoRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// Mutate a record in place and return the updated copy.
    pub async fn update<F>(&self, id: &VideoId, f: F) -> Option<VideoRecord>
    where
        F: FnOnce(&mut VideoRecord),
    {
        let mut records = self.records.write().await;
        let record = records.get_mut(id)?;
        f(record);
        Some(record.clone())
    }

    /// All records newest first, optionally restricted to one status.
    pub async fn list(&self, status: Option<VideoStatus>) -> Vec<VideoRecord> {
        let records = self.records.read().await;
        let mut out: Vec<VideoRecord> = records
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Planned edit jobs keyed by job id.
#[derive(Debug, Clone, Default)]
pub struct EditStore {
    plans: Arc<RwLock<HashMap<EditJobId, EditPlan>>>,
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, plan: EditPlan) {
        self.plans.write().await.insert(plan.job_id.clone(), plan);
    }

    pub async fn get(&self, job_id: &EditJobId) -> Option<EditPlan> {
        self.plans.read().await.get(job_id).cloned()
    }
}
