use std::{env, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, LoggingConfig, DEFAULT_API_URL,
    DEFAULT_SCAN_TIMEOUT_MS,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = match var("API_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => parse_base_url(DEFAULT_API_URL)?,
        };
        let request_timeout = match var("SCAN_TIMEOUT_MS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Some(Duration::from_millis(DEFAULT_SCAN_TIMEOUT_MS)),
        };

        let classifier = ClassifierConfig {
            base_url,
            request_timeout,
        };

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            console: var("LOG_TO_CONSOLE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        Ok(Self {
            classifier,
            directories,
            logging,
        })
    }
}

/// Accepts only absolute http(s) addresses.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "API_URL",
        value: raw.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

/// Milliseconds; `0` disables the timeout.
pub fn parse_timeout(raw: &str) -> Result<Option<Duration>, ConfigError> {
    let millis = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid {
            key: "SCAN_TIMEOUT_MS",
            value: raw.to_string(),
        })?;
    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}
