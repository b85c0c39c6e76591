use std::time::Duration;

use crate::AuthPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const BASE_URL_VAR: &str = "NOVEL_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "NOVEL_API_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub auth: AuthPolicy,
    /// Cap on simultaneous requests when fanning out (e.g. detail lookups).
    pub fanout_limit: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            auth: AuthPolicy::default(),
            fanout_limit: 8,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientSettings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(raw) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            let trimmed = raw.trim();
            url::Url::parse(trimmed)
                .map_err(|e| ConfigError::InvalidValue(BASE_URL_VAR.to_string(), e.to_string()))?;
            settings.base_url = trimmed.to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    TIMEOUT_VAR.to_string(),
                    format!("'{raw}' is not a whole number of seconds"),
                )
            })?;
            settings.request_timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }
}
