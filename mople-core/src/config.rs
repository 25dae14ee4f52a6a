//! Client configuration.
//!
//! Loaded once at startup from JSON (bundled asset or file). Every field has
//! a default so a partial document is enough.

use mople_paging::limits::{
    clamp_debounce_ms, DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_PAGE_SIZE,
    DEFAULT_SEARCH_DEBOUNCE_MS, MAX_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(String),
    #[error("Malformed config: {0}")]
    Parse(String),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Logcat tag on Android.
    pub tag: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            tag: "Mople".to_string(),
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub event_channel_capacity: usize,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.mople.app".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_secs: 15,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: format!("must be within 1..={}", MAX_PAGE_SIZE),
            });
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "event_channel_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Debounce window, clamped into the supported range.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(clamp_debounce_ms(self.search_debounce_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config =
            AppConfig::from_json(r#"{"page_size": 20, "log": {"level": "debug"}}"#).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_debounce_ms, DEFAULT_SEARCH_DEBOUNCE_MS);
        assert_eq!(config.log.tag, "Mople");
        assert_eq!(config.log.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            AppConfig::from_json(r#"{"page_size": 0}"#),
            Err(ConfigError::Invalid { field: "page_size", .. })
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"api_base_url": " "}"#),
            Err(ConfigError::Invalid { field: "api_base_url", .. })
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"event_channel_capacity": 0}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_debounce_is_clamped() {
        let config = AppConfig {
            search_debounce_ms: 50,
            ..AppConfig::default()
        };
        assert_eq!(config.search_debounce(), Duration::from_millis(400));
        let config = AppConfig {
            search_debounce_ms: 2_000,
            ..AppConfig::default()
        };
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_base_url": "http://localhost:8080"}}"#).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));

        assert!(matches!(
            AppConfig::load(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }
}
