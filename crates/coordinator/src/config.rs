use crate::retry::RetryPolicy;
use crate::{CoordinatorError, Result};
use prose_suggest::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const REMOTE_URL_ENV: &str = "PROSE_REMOTE_URL";
pub const DEBOUNCE_MS_ENV: &str = "PROSE_DEBOUNCE_MS";

/// Engine settings, usually read from a `prose.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub debounce: DebounceConfig,
    pub retry: RetryConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period after the last edit before analysis starts
    pub delay_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self { delay_ms: 1_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub base_delay_ms: u64,
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 500,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Grammar service root; `None` runs on the local dictionary alone
    pub url: Option<String>,
    pub language: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| CoordinatorError::invalid_config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Applies `PROSE_REMOTE_URL` and `PROSE_DEBOUNCE_MS` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(REMOTE_URL_ENV) {
            let url = url.trim();
            self.remote.url = (!url.is_empty()).then(|| url.to_string());
        }
        if let Some(raw) = lookup(DEBOUNCE_MS_ENV) {
            self.debounce.delay_ms = raw.trim().parse().map_err(|_| {
                CoordinatorError::invalid_config(format!("{DEBOUNCE_MS_ENV}={raw} is not a number"))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.remote.language.trim().is_empty() {
            return Err(CoordinatorError::invalid_config(
                "remote.language must not be empty",
            ));
        }
        if let Some(url) = &self.remote.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CoordinatorError::invalid_config(format!(
                    "remote.url must be an http(s) URL (got {url})"
                )));
            }
        }
        if self.retry.max_retries > 10 {
            return Err(CoordinatorError::invalid_config(format!(
                "retry.max_retries ({}) cannot exceed 10",
                self.retry.max_retries
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce.delay_ms)
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.retry.base_delay_ms),
            self.retry.max_retries,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_secs(1));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.remote.language, "en-US");
        assert_eq!(config.remote.url, None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [remote]
            url = "http://localhost:8081"

            [retry]
            max_retries = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.remote.url.as_deref(), Some("http://localhost:8081"));
        assert_eq!(config.remote.language, "en-US");
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.base_delay_ms, 500);
        assert_eq!(config.debounce.delay_ms, 1_000);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prose.toml");
        std::fs::write(&path, "[debounce]\ndelay_ms = 250\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(250));

        let missing = EngineConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(CoordinatorError::IoError(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = EngineConfig::default()
            .with_overrides(|key| match key {
                REMOTE_URL_ENV => Some("https://lt.example.com".to_string()),
                DEBOUNCE_MS_ENV => Some("300".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.remote.url.as_deref(), Some("https://lt.example.com"));
        assert_eq!(config.debounce.delay_ms, 300);

        let bad = EngineConfig::default()
            .with_overrides(|key| (key == DEBOUNCE_MS_ENV).then(|| "soon".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn config_validation() {
        let mut config = EngineConfig::default();

        config.remote.url = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());

        config.remote.url = Some("http://localhost:8081".to_string());
        config.retry.max_retries = 50;
        assert!(config.validate().is_err());

        config.retry.max_retries = 3;
        config.remote.language = "  ".to_string();
        assert!(config.validate().is_err());

        config.remote.language = "en-US".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_types_are_config_errors() {
        let err = EngineConfig::from_toml_str("[retry]\nmax_retries = \"many\"\n").unwrap_err();
        assert!(matches!(err, CoordinatorError::InvalidConfig(_)));
    }
}
