//! Scene models and extraction from provider analysis payloads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Scene identifier, unique within one video's timeline.
pub type SceneId = u32;

/// Overall tone of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    #[serde(other)]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time-bounded segment of an analyzed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    pub id: SceneId,

    /// Start offset in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub sentiment: Sentiment,
}

impl Scene {
    pub fn new(id: SceneId, start: f64, end: f64) -> Self {
        Self {
            id,
            start,
            end: end.max(start),
            transcript: None,
            tags: Vec::new(),
            sentiment: Sentiment::Neutral,
        }
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "happy", "joy", "love", "smile", "excited", "great", "amazing", "fun", "celebrat", "success",
    "win", "delight", "beautiful", "laugh",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad", "angry", "fear", "problem", "fail", "loss", "pain", "worry", "crash", "broken",
    "frustrat", "danger",
];

/// Keyword-based tone guess for providers that only return prose summaries.
pub fn infer_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Extract a scene timeline from an opaque provider payload.
///
/// Understands `chapters[]` (summarize-style output) and `scenes[]`
/// (already-normalized output). Entries without usable offsets are skipped.
pub fn scenes_from_analysis(analysis: &Value) -> Vec<Scene> {
    if let Some(chapters) = analysis.get("chapters").and_then(Value::as_array) {
        return chapters
            .iter()
            .enumerate()
            .filter_map(|(idx, chapter)| scene_from_chapter(idx, chapter))
            .collect();
    }

    if let Some(scenes) = analysis.get("scenes").and_then(Value::as_array) {
        return scenes
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| scene_from_raw(idx, raw))
            .collect();
    }

    Vec::new()
}

fn number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(Value::as_f64))
}

fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn scene_id(value: &Value, keys: &[&str], idx: usize) -> SceneId {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(Value::as_u64))
        .map(|id| id as SceneId)
        .unwrap_or(idx as SceneId + 1)
}

fn scene_from_chapter(idx: usize, chapter: &Value) -> Option<Scene> {
    let start = number(chapter, &["start", "start_sec"])?;
    let end = number(chapter, &["end", "end_sec"])?;
    if end < start {
        return None;
    }

    let title = text(chapter, "chapter_title");
    let summary = text(chapter, "chapter_summary");
    let sentiment = summary
        .as_deref()
        .or(title.as_deref())
        .map(infer_sentiment)
        .unwrap_or_default();

    let mut scene = Scene::new(scene_id(chapter, &["chapter_number", "id"], idx), start, end)
        .with_sentiment(sentiment);
    scene.transcript = summary;
    if let Some(title) = title {
        scene.tags.push(title);
    }
    Some(scene)
}

fn scene_from_raw(idx: usize, raw: &Value) -> Option<Scene> {
    let start = number(raw, &["start", "start_sec"])?;
    let end = number(raw, &["end", "end_sec"])?;
    if end < start {
        return None;
    }

    let tags = raw
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let sentiment = raw
        .get("sentiment")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let mut scene = Scene::new(scene_id(raw, &["id"], idx), start, end).with_sentiment(sentiment);
    scene.transcript = text(raw, "transcript");
    scene.tags = tags;
    Some(scene)
}
