use morbror_core::settings::VoiceTimings;
use morbror_core::speech::elevenlabs::DEFAULT_BASE_URL;
use secrecy::SecretString;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub courses_path: PathBuf,
    pub elevenlabs_api_key: Option<SecretString>,
    pub elevenlabs_base_url: String,
    pub frontend_origin: String,
    pub log_level: Level,
    pub timings: VoiceTimings,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let courses_path = std::env::var("COURSES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        // An empty key means "not configured", same as an absent one.
        let elevenlabs_api_key = std::env::var("ELEVENLABS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);
        let elevenlabs_base_url = std::env::var("ELEVENLABS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let frontend_origin = std::env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let defaults = VoiceTimings::default();
        let timings = VoiceTimings {
            listen_delay: delay_from_env("LISTEN_DELAY_MS", defaults.listen_delay)?,
            recognize_delay: delay_from_env("RECOGNIZE_DELAY_MS", defaults.recognize_delay)?,
            reveal_delay: delay_from_env("REVEAL_DELAY_MS", defaults.reveal_delay)?,
            settle_delay: delay_from_env("SETTLE_DELAY_MS", defaults.settle_delay)?,
        };

        Ok(Self {
            bind_address,
            courses_path,
            elevenlabs_api_key,
            elevenlabs_base_url,
            frontend_origin,
            log_level,
            timings,
        })
    }
}

fn delay_from_env(var: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
