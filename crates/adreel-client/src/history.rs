//! Upload history persisted as a JSON file under the user config dir.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use adreel_models::{History, HistoryEntry, VideoId, VideoStatus};

use crate::error::ClientResult;

/// `<config dir>/adreel/history.json`, or a file in the working directory
/// when the platform has no config dir.
pub fn default_history_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("adreel"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("history.json")
}

/// File-backed [`History`].
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the history. A missing file is an empty history; an unreadable
    /// one is logged and treated as empty so a bad file never blocks uploads.
    pub fn load(&self) -> ClientResult<History> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(History::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<History>(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt history file");
                Ok(History::new())
            }
        }
    }

    pub fn save(&self, history: &History) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(history)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Add or refresh an entry and persist.
    pub fn record(&self, entry: HistoryEntry) -> ClientResult<History> {
        let mut history = self.load()?;
        history.record(entry);
        self.save(&history)?;
        Ok(history)
    }

    /// Update an entry's status and persist. Unknown ids are a no-op.
    pub fn update_status(&self, video_id: &VideoId, status: VideoStatus) -> ClientResult<bool> {
        let mut history = self.load()?;
        let found = history.update_status(video_id, status);
        if found {
            self.save(&history)?;
        }
        Ok(found)
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.save(&History::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_models::HISTORY_LIMIT;

    fn store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("history.json"));
        (dir, store)
    }

    fn entry(n: usize) -> HistoryEntry {
        let mut e = HistoryEntry::new(VideoId::from(format!("vid_{:08x}", n)), VideoStatus::Processing);
        e.url = Some(format!("https://cdn.example.com/{}.mp4", n));
        e
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_persists_newest_first() {
        let (_dir, store) = store();
        store.record(entry(1)).unwrap();
        store.record(entry(2)).unwrap();

        let history = store.load().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].video_id, entry(2).video_id);
    }

    #[test]
    fn test_persisted_history_is_capped() {
        let (_dir, store) = store();
        let mut history = History::new();
        for n in 0..(HISTORY_LIMIT + 5) {
            history.record(entry(n));
        }
        store.save(&history).unwrap();
        store.record(entry(999)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), HISTORY_LIMIT);
        assert_eq!(loaded.entries()[0].video_id, entry(999).video_id);
    }

    #[test]
    fn test_update_status_and_clear() {
        let (_dir, store) = store();
        store.record(entry(1)).unwrap();

        assert!(store.update_status(&entry(1).video_id, VideoStatus::Completed).unwrap());
        assert!(!store.update_status(&entry(7).video_id, VideoStatus::Completed).unwrap());
        assert_eq!(store.load().unwrap().entries()[0].status, VideoStatus::Completed);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
