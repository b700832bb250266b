//! Configuration management

use crate::error::{ErrorContext, ScholarError, ScholarResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Production answer-generation service
pub const DEFAULT_API_URL: &str = "https://academic-website-backend.onrender.com";

/// Host-provided override for the backend base URL
pub const API_URL_ENV: &str = "CHAT_API_URL";

/// Status shown while a request is pending
pub const DEFAULT_WORKING_STATUS: &str = "Thinking...";

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScholarConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatSettings,
}

/// Backend connection settings, fixed at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; `/chat` and `/health` are appended
    pub base_url: String,
    /// Transport timeout. `None` leaves the transport default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("scholar/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Replace the base URL with a host-provided value, if one is set
    pub fn with_host_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|v| v.trim().to_string()) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    pub fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }

    pub fn health_endpoint(&self) -> String {
        format!("{}/health", self.base_url.trim_end_matches('/'))
    }
}

/// Chat widget behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Text shown while a request is pending
    pub working_status: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            working_status: DEFAULT_WORKING_STATUS.to_string(),
        }
    }
}

impl ScholarConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScholarResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScholarError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        toml::from_str(&content).map_err(|e| ScholarError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Save configuration to file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ScholarResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ScholarError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| ScholarError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })
    }

    /// Apply the `CHAT_API_URL` environment override
    pub fn apply_env(mut self) -> Self {
        self.api = self.api.with_host_override(std::env::var(API_URL_ENV).ok());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ScholarResult<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| ScholarError::Config {
            message: format!("Invalid api.base_url '{}': {}", self.api.base_url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("validate")
                .with_suggestion("Use an absolute URL such as https://example.org"),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScholarError::Config {
                message: format!("Unsupported URL scheme: {}", url.scheme()),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.base_url to an http or https URL"),
            });
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(ScholarError::Config {
                message: "api.timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Remove api.timeout_seconds or set a positive value"),
            });
        }

        Ok(())
    }

    /// Candidate locations searched when no explicit config path is given
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|d| d.join("scholar").join("config.toml")),
            dirs::home_dir().map(|d| d.join(".scholar").join("config.toml")),
            Some(PathBuf::from("scholar.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_strip_trailing_slash() {
        let api = ApiConfig::new("http://localhost:8001/");
        assert_eq!(api.chat_endpoint(), "http://localhost:8001/chat");
        assert_eq!(api.health_endpoint(), "http://localhost:8001/health");
    }

    #[test]
    fn test_host_override() {
        let api = ApiConfig::default().with_host_override(Some("http://localhost:8001".into()));
        assert_eq!(api.base_url, "http://localhost:8001");

        let api = ApiConfig::default().with_host_override(Some("   ".into()));
        assert_eq!(api.base_url, DEFAULT_API_URL);

        let api = ApiConfig::default().with_host_override(None);
        assert_eq!(api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_validate() {
        assert!(ScholarConfig::default().validate().is_ok());

        let mut config = ScholarConfig::default();
        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = ScholarConfig::default();
        config.api.base_url = "ftp://example.org".into();
        assert!(config.validate().is_err());

        let mut config = ScholarConfig::default();
        config.api.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }
}
