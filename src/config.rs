use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LuminousError, Result};

/// Default generation service endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Configuration for the Luminous client and preview poller.
///
/// Use [`ClientConfig::builder()`] for ergonomic construction,
/// [`ClientConfig::from_env()`] to read `LUMINOUS_*` variables, or
/// [`ClientConfig::default()`] for a local service polled once a second.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the generation service.
    pub endpoint: String,

    /// Delay between preview status queries.
    pub poll_interval: Duration,

    /// Give up polling after this long. `None` = poll until a terminal status.
    pub poll_timeout: Option<Duration>,

    /// Give up polling after this many status queries. `None` = unlimited.
    pub max_attempts: Option<u32>,

    /// Per-request HTTP timeout.
    pub request_timeout: Duration,

    /// Directory downloaded wallpapers are written to.
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval: Duration::from_millis(1000),
            poll_timeout: None,
            max_attempts: None,
            request_timeout: Duration::from_secs(30),
            download_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Start building a config with the builder pattern.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load `.env` (if present) and apply `LUMINOUS_*` environment overrides.
    ///
    /// | Variable                      | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `LUMINOUS_ENDPOINT`           | `http://127.0.0.1:8000` |
    /// | `LUMINOUS_POLL_INTERVAL_MS`   | `1000`                  |
    /// | `LUMINOUS_POLL_TIMEOUT_SECS`  | unset (no timeout)      |
    /// | `LUMINOUS_MAX_ATTEMPTS`       | unset (unlimited)       |
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(endpoint) = lookup("LUMINOUS_ENDPOINT") {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "LUMINOUS_POLL_INTERVAL_MS")? {
            builder = builder.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "LUMINOUS_POLL_TIMEOUT_SECS")? {
            builder = builder.with_poll_timeout(Duration::from_secs(secs));
        }
        if let Some(max) = parse_var::<u32>(&lookup, "LUMINOUS_MAX_ATTEMPTS")? {
            builder = builder.with_max_attempts(max);
        }

        builder.try_build()
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LuminousError::InvalidConfig(format!("{} must be a number, got {:?}", key, raw))),
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the generation service base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the delay between preview status queries.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Stop polling after `timeout` without a terminal status.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.config.poll_timeout = Some(timeout);
        self
    }

    /// Stop polling after `max` status queries.
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.config.max_attempts = Some(max);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = dir.into();
        self
    }

    /// Build the final [`ClientConfig`] without validation.
    pub fn build(self) -> ClientConfig {
        self.config
    }

    /// Build the final [`ClientConfig`], rejecting values the poller cannot use.
    pub fn try_build(self) -> Result<ClientConfig> {
        let config = self.config;
        if config.poll_interval.is_zero() {
            return Err(LuminousError::InvalidConfig(
                "poll interval must be greater than zero".into(),
            ));
        }
        if config.max_attempts == Some(0) {
            return Err(LuminousError::InvalidConfig(
                "max attempts must be at least 1".into(),
            ));
        }
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
            return Err(LuminousError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got {:?}",
                config.endpoint
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.poll_timeout.is_none());
        assert!(config.max_attempts.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .with_endpoint("https://wallpapers.example")
            .with_poll_interval(Duration::from_millis(250))
            .with_poll_timeout(Duration::from_secs(60))
            .with_max_attempts(10)
            .build();
        assert_eq!(config.endpoint, "https://wallpapers.example");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.poll_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.max_attempts, Some(10));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = ClientConfig::builder()
            .with_poll_interval(Duration::ZERO)
            .try_build();
        assert!(matches!(result, Err(LuminousError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("LUMINOUS_ENDPOINT", "http://gen.local:9000"),
            ("LUMINOUS_POLL_INTERVAL_MS", "500"),
            ("LUMINOUS_POLL_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://gen.local:9000");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.poll_timeout, Some(Duration::from_secs(30)));
        assert!(config.max_attempts.is_none());
    }

    #[test]
    fn test_from_lookup_bad_number() {
        let result = ClientConfig::from_lookup(lookup_from(&[("LUMINOUS_MAX_ATTEMPTS", "lots")]));
        assert!(matches!(result, Err(LuminousError::InvalidConfig(_))));
    }
}
