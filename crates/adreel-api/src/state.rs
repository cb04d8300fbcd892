//! Application state.

use std::sync::Arc;

use tracing::info;

use crate::config::{ApiConfig, ProviderKind};
use crate::services::{AnalysisProvider, EditStore, SimulatedProvider, TwelveLabsProvider, VideoStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub provider: Arc<dyn AnalysisProvider>,
    pub videos: VideoStore,
    pub edits: EditStore,
}

impl AppState {
    /// Create application state, picking the provider named in the config.
    pub fn new(config: ApiConfig) -> Self {
        let provider: Arc<dyn AnalysisProvider> = match config.provider {
            ProviderKind::TwelveLabs => Arc::new(TwelveLabsProvider::from_env()),
            ProviderKind::Simulated => Arc::new(SimulatedProvider::new(config.simulation_step)),
        };
        info!(provider = %config.provider, configured = provider.is_configured(), "Analysis provider ready");

        Self::with_provider(config, provider)
    }

    /// Create application state around an explicit provider.
    pub fn with_provider(config: ApiConfig, provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            config,
            provider,
            videos: VideoStore::new(),
            edits: EditStore::new(),
        }
    }
}
