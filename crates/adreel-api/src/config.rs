//! API configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use adreel_models::FILE_SIZE_LIMIT_BYTES;

/// Which analysis backend the relay talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// TwelveLabs video understanding API
    #[default]
    TwelveLabs,
    /// Timer-driven stand-in for demos and offline development
    Simulated,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::TwelveLabs => "twelvelabs",
            ProviderKind::Simulated => "simulated",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twelvelabs" | "twelve_labs" | "tl" => Ok(ProviderKind::TwelveLabs),
            "simulated" | "simulation" | "mock" => Ok(ProviderKind::Simulated),
            other => Err(format!("Unknown analysis provider: {}", other)),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Allowed CORS origins; empty means any localhost port
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second per client IP
    pub rate_limit_rps: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size (must fit a 100MB upload plus multipart framing)
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Analysis backend
    pub provider: ProviderKind,
    /// Length of one simulated processing stage
    pub simulation_step: Duration,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            rate_limit_rps: 10,
            request_timeout: Duration::from_secs(120),
            max_body_size: FILE_SIZE_LIMIT_BYTES as usize + 10 * 1024 * 1024,
            environment: "development".to_string(),
            provider: ProviderKind::TwelveLabs,
            simulation_step: Duration::from_secs(3),
            metrics_enabled: true,
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_rps: env_parse("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            request_timeout: env_parse("REQUEST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            provider: env_parse("ANALYSIS_PROVIDER").unwrap_or(defaults.provider),
            simulation_step: env_parse("SIMULATION_STEP_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.simulation_step),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// A config for in-process tests: simulated provider, no metrics.
    pub fn for_tests() -> Self {
        Self {
            provider: ProviderKind::Simulated,
            simulation_step: Duration::ZERO,
            metrics_enabled: false,
            rate_limit_rps: 1000,
            ..Self::default()
        }
    }
}
