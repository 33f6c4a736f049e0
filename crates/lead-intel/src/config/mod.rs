use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::discovery::DiscoveryOptions;
use crate::matching::MatchConfig;
use crate::qualification::QualificationThresholds;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("LEAD_INTEL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                include_targets: environment == AppEnvironment::Development,
            },
            engine: EngineSettings::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub include_targets: bool,
}

/// Caller-side defaults applied when a request omits its own engine settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub matching: MatchConfig,
    pub thresholds: QualificationThresholds,
    pub discovery: DiscoveryOptions,
}

impl EngineSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(value) = env_number::<u8>("LEAD_MIN_SCORE")? {
            settings.thresholds.min_score = value;
        }
        if let Some(value) = env_number::<u8>("LEAD_APPROVE_SCORE")? {
            settings.thresholds.approve_score = value;
        }
        if let Some(value) = env_number::<u8>("LEAD_MIN_MATCH_FOR_APPROVE")? {
            settings.thresholds.min_match_for_approve = value;
        }
        if let Some(value) = env_number::<u8>("LEAD_HOT_SCORE")? {
            settings.thresholds.hot_score = value;
        }
        if let Some(value) = env_number::<u8>("LEAD_WARM_SCORE")? {
            settings.thresholds.warm_score = value;
        }
        if let Some(value) = env_number::<usize>("DISCOVERY_MAX_RESULTS")? {
            settings.discovery.max_results = value;
        }
        if let Some(value) = env_number::<f64>("DISCOVERY_MIN_SIMILARITY")? {
            settings.discovery.min_similarity_score = value;
        }
        if let Some(value) = env_number::<f64>("DISCOVERY_NAME_THRESHOLD")? {
            settings.discovery.name_threshold = value;
            settings.matching.name_threshold = value;
        }

        settings
            .thresholds
            .validate()
            .map_err(|err| ConfigError::InvalidEngineSetting {
                key: "LEAD_*",
                detail: err.to_string(),
            })?;
        settings
            .discovery
            .validate()
            .map_err(|err| ConfigError::InvalidEngineSetting {
                key: "DISCOVERY_*",
                detail: err.to_string(),
            })?;

        Ok(settings)
    }
}

fn env_number<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        _ => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidEngineSetting { key: &'static str, detail: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric, got '{value}'")
            }
            ConfigError::InvalidEngineSetting { key, detail } => {
                write!(f, "{key} settings rejected: {detail}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidEngineSetting { .. } => None,
        }
    }
}
