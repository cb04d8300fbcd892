//! TwelveLabs REST API client.
//!
//! This crate provides:
//! - Task submission from a URL or raw file bytes (multipart)
//! - Task and video lookups used for status polling
//! - Chapter summaries that become the scene timeline
//! - Index listing and creation for first-time setup
//! - Mapping of provider task states onto the AdReel status lifecycle

pub mod client;
pub mod error;
pub mod metrics;
pub mod status;
pub mod types;


pub use client::{TwelveLabsClient, TwelveLabsConfig, DEFAULT_API_BASE};
pub use error::{TwelveLabsError, TwelveLabsResult};
pub use status::{map_task_status, TaskStatus};
pub use types::{CreateIndexRequest, EngineConfig, IndexSummary, SummarizeRequest, Task, TaskCreated};
