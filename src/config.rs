use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Content store
    pub content_api_url: String,
    pub document_type: String,
    pub field_allowlist: Vec<String>,

    // Listing
    pub page_size: u32,

    // HTTP
    pub fetch_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            content_api_url: required_env("CONTENT_API_URL")?,
            document_type: env_or_default("DOCUMENT_TYPE", "posts"),
            field_allowlist: parse_allowlist(&env_or_default(
                "FIELD_ALLOWLIST",
                "post.title,post.subtitle,post.author",
            )),
            page_size: parse_env_u32("PAGE_SIZE", 20)?,
            fetch_timeout: Duration::from_secs(parse_env_u64("FETCH_TIMEOUT_SECS", 30)?),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_api_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "CONTENT_API_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "PAGE_SIZE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.document_type.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "DOCUMENT_TYPE".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// A configuration suitable for tests, without touching the environment.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            content_api_url: "http://localhost/api/v2".to_string(),
            document_type: "posts".to_string(),
            field_allowlist: vec![
                "post.title".to_string(),
                "post.subtitle".to_string(),
                "post.author".to_string(),
            ],
            page_size: 3,
            fetch_timeout: Duration::from_secs(5),
        }
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_allowlist(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
