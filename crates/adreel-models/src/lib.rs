//! Shared data models for the AdReel video relay and front end.
//!
//! This crate provides Serde-serializable types for:
//! - Video records and the linear processing status lifecycle
//! - Analyzed scenes and automatic scene selection
//! - Upload validation (URLs, filenames, file sizes)
//! - Ad templates and edit-generation requests
//! - The locally persisted upload history

pub mod edit;
pub mod history;
pub mod scene;
pub mod selection;
pub mod template;
pub mod validation;
pub mod video;

// Re-export common types
pub use edit::{
    plan_edit, EditError, EditJobId, EditPlan, EditRequest, EditResponse, EditSegment, GeneratedFile,
    MAX_EDIT_DURATION_SECS,
};
pub use history::{History, HistoryEntry, HISTORY_LIMIT};
pub use scene::{infer_sentiment, scenes_from_analysis, Scene, SceneId, Sentiment};
pub use selection::{auto_select, filter_by_status, SceneSelection};
pub use template::{AspectRatio, AspectRatioParseError, CaptionStyle, Template};
pub use validation::{
    check_file_size, format_bytes, validate_url, validate_video_filename, SizeCheck, ValidationError,
    FILE_SIZE_LIMIT_BYTES, FILE_SIZE_WARN_BYTES,
};
pub use video::{StatusUpdate, VideoId, VideoRecord, VideoSource, VideoStatus};
