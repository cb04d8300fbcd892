//! Axum relay between the AdReel front end and the video analysis provider.
//!
//! This crate provides:
//! - Upload, status polling and analysis lookup endpoints
//! - Edit planning over analyzed scene timelines
//! - TwelveLabs and simulated analysis providers
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod envfile;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, ProviderKind};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{AnalysisProvider, SimulatedProvider, TaskSnapshot, TwelveLabsProvider};
pub use state::AppState;
