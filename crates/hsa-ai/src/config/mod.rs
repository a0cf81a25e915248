use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::enrollment::domain::DecisionConfig;

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
    pub assistant: AssistantSettings,
    pub decision: DecisionConfig,
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

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let knowledge_base_dir = env::var("HSA_KNOWLEDGE_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/knowledge_base"));
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty());
        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        let decision = load_decision_config()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assistant: AssistantSettings {
                knowledge_base_dir,
                openai_api_key,
                openai_base_url,
            },
            decision,
        })
    }
}

fn load_decision_config() -> Result<DecisionConfig, ConfigError> {
    let mut config = DecisionConfig::default();

    if let Ok(raw) = env::var("HSA_NAME_MATCH_THRESHOLD") {
        config.name_match_threshold = parse_threshold("HSA_NAME_MATCH_THRESHOLD", &raw)?;
    }
    if let Ok(raw) = env::var("HSA_AUTO_APPROVE_THRESHOLD") {
        config.auto_approve_threshold = parse_threshold("HSA_AUTO_APPROVE_THRESHOLD", &raw)?;
    }
    if let Ok(raw) = env::var("HSA_MANUAL_REVIEW_THRESHOLD") {
        config.manual_review_threshold = parse_threshold("HSA_MANUAL_REVIEW_THRESHOLD", &raw)?;
    }
    if let Ok(raw) = env::var("HSA_EXPIRED_ID_AUTO_REJECT") {
        config.expired_id_auto_reject = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                return Err(ConfigError::InvalidFlag {
                    name: "HSA_EXPIRED_ID_AUTO_REJECT",
                })
            }
        };
    }

    config
        .validate()
        .map_err(|source| ConfigError::InvalidThreshold { name: source.name() })?;

    Ok(config)
}

fn parse_threshold(name: &'static str, raw: &str) -> Result<f32, ConfigError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| ConfigError::InvalidThreshold { name })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knowledge base and model-provider settings for the assistant pipeline.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub knowledge_base_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { name: &'static str },
    InvalidFlag { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { name } => {
                write!(f, "{name} must be a number between 0.0 and 1.0")
            }
            ConfigError::InvalidFlag { name } => {
                write!(f, "{name} must be a boolean flag")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
