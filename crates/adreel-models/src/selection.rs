//! Scene selection and record filtering.

use serde::{Deserialize, Serialize};

use crate::scene::{Scene, SceneId, Sentiment};
use crate::video::{VideoRecord, VideoStatus};

/// Pick a sensible default set of scenes for an ad cut.
///
/// Always takes the first scene, then the first positive-sentiment scene and
/// the middle scene when they exist. Ids come back in timeline order without
/// duplicates.
pub fn auto_select(scenes: &[Scene]) -> Vec<SceneId> {
    if scenes.is_empty() {
        return Vec::new();
    }

    let mut picked = vec![0usize];

    if let Some(idx) = scenes
        .iter()
        .position(|s| s.sentiment == Sentiment::Positive)
    {
        picked.push(idx);
    }

    if scenes.len() > 1 {
        picked.push(scenes.len() / 2);
    }

    picked.sort_unstable();
    picked.dedup();
    picked.into_iter().map(|idx| scenes[idx].id).collect()
}

/// Records with the given status, in their original order.
pub fn filter_by_status(records: &[VideoRecord], status: VideoStatus) -> Vec<&VideoRecord> {
    records.iter().filter(|r| r.status == status).collect()
}

/// Ordered set of scene ids picked by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSelection {
    ids: Vec<SceneId>,
}

impl SceneSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the automatic picks.
    pub fn auto(scenes: &[Scene]) -> Self {
        Self {
            ids: auto_select(scenes),
        }
    }

    pub fn from_ids<I: IntoIterator<Item = SceneId>>(ids: I) -> Self {
        let mut selection = Self::new();
        for id in ids {
            if !selection.contains(id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Add the id if absent, remove it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, id: SceneId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[SceneId] {
        &self.ids
    }

    /// Selected scenes in timeline order (not click order).
    pub fn selected_scenes<'a>(&self, scenes: &'a [Scene]) -> Vec<&'a Scene> {
        scenes.iter().filter(|s| self.contains(s.id)).collect()
    }

    /// Total running time of the selection in seconds.
    pub fn total_duration(&self, scenes: &[Scene]) -> f64 {
        self.selected_scenes(scenes)
            .iter()
            .map(|s| s.duration())
            .sum()
    }
}
