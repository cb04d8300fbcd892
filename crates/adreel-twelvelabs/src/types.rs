//! Wire types for the TwelveLabs v1.3 API.

use serde::{Deserialize, Serialize};

/// Response to `POST /tasks`.
///
/// The task id arrives as `_id`; older API versions used `task_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreated {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}

impl TaskCreated {
    /// The task identifier, whichever field carried it.
    pub fn task_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.task_id.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Response to `GET /tasks/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Task {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default = "default_task_status")]
    pub status: String,
    #[serde(default)]
    pub index_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

fn default_task_status() -> String {
    "processing".to_string()
}

/// Entry of `GET /indexes`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub index_name: Option<String>,
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IndexList {
    #[serde(default)]
    pub data: Vec<IndexSummary>,
}

/// Engine entry of an index definition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    pub engine_name: String,
    #[serde(default)]
    pub engine_options: Vec<String>,
}

impl EngineConfig {
    pub fn new(name: &str, options: &[&str]) -> Self {
        Self {
            engine_name: name.to_string(),
            engine_options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Body of `POST /summarize`.
#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest<'a> {
    pub video_id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

impl<'a> SummarizeRequest<'a> {
    pub fn chapters(video_id: &'a str) -> Self {
        Self {
            video_id,
            kind: "chapter",
        }
    }
}

/// Response to a chapter summary. Entries carry `chapter_number`,
/// `start_sec`, `end_sec`, `chapter_title` and `chapter_summary`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChapterSummary {
    #[serde(default)]
    pub chapters: Vec<serde_json::Value>,
}

/// Body of `POST /indexes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateIndexRequest {
    pub index_name: String,
    pub engines: Vec<EngineConfig>,
    pub addons: Vec<String>,
}

impl Default for CreateIndexRequest {
    /// Index tuned for advertising content: visual, speech, on-screen text
    /// and logo search, plus scene thumbnails.
    fn default() -> Self {
        Self {
            index_name: "advertising-video-analysis".to_string(),
            engines: vec![
                EngineConfig::new(
                    "marengo2.6",
                    &["visual", "conversation", "text_in_video", "logo"],
                ),
                EngineConfig::new("pegasus1.1", &["conversation", "text_in_video"]),
            ],
            addons: vec!["thumbnail".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_created_prefers_underscore_id() {
        let created: TaskCreated =
            serde_json::from_value(json!({"_id": "t1", "task_id": "t2"})).unwrap();
        assert_eq!(created.task_id(), Some("t1"));

        let legacy: TaskCreated = serde_json::from_value(json!({"task_id": "t2"})).unwrap();
        assert_eq!(legacy.task_id(), Some("t2"));

        let empty: TaskCreated = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.task_id(), None);
    }

    #[test]
    fn test_task_status_defaults_to_processing() {
        let task: Task = serde_json::from_value(json!({"_id": "t1"})).unwrap();
        assert_eq!(task.status, "processing");
    }

    #[test]
    fn test_chapter_summary_request() {
        let body = serde_json::to_value(SummarizeRequest::chapters("tlvid_1")).unwrap();
        assert_eq!(body, json!({"video_id": "tlvid_1", "type": "chapter"}));
    }

    #[test]
    fn test_default_index_request() {
        let request = CreateIndexRequest::default();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["index_name"], "advertising-video-analysis");
        assert_eq!(body["engines"][0]["engine_name"], "marengo2.6");
        assert_eq!(body["engines"][1]["engine_options"], json!(["conversation", "text_in_video"]));
        assert_eq!(body["addons"], json!(["thumbnail"]));
    }
}
