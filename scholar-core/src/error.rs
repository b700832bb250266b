//! Unified error handling system
//!
//! Two families of errors live here. [`ErrorKind`] is the closed taxonomy a
//! chat request can fail with; it is what the user sees in the transcript.
//! [`ScholarError`] covers everything else (configuration, terminal I/O,
//! logging setup) and carries an [`ErrorContext`] for diagnostics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type ScholarResult<T> = Result<T, ScholarError>;

/// Outcome classification for a failed chat request.
///
/// The `Display` text is the exact sentence shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// HTTP 429
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    /// HTTP 503
    #[error("The chat service is temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    /// Any other non-2xx status, or an undecodable success body
    #[error("An error occurred while processing your request. Please try again.")]
    ApiError,

    /// No HTTP response was obtained
    #[error("Network error. Please check your connection and try again.")]
    NetworkError,
}

impl ErrorKind {
    /// Classify a non-success HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => ErrorKind::RateLimited,
            503 => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::ApiError,
        }
    }

    /// Parse a wire-level error code. Unknown codes fall back to [`ErrorKind::ApiError`].
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "RATE_LIMIT" => ErrorKind::RateLimited,
            "SERVICE_UNAVAILABLE" => ErrorKind::ServiceUnavailable,
            "NETWORK_ERROR" => ErrorKind::NetworkError,
            _ => ErrorKind::ApiError,
        }
    }

    /// Stable code for logs and serialized diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::RateLimited => "RATE_LIMIT",
            ErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorKind::ApiError => "API_ERROR",
            ErrorKind::NetworkError => "NETWORK_ERROR",
        }
    }

    /// The user-visible sentence for this kind.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether the user resubmitting later can plausibly succeed.
    ///
    /// Nothing is retried automatically; this only drives hints in front ends.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::RateLimited | ErrorKind::ServiceUnavailable | ErrorKind::NetworkError => {
                true
            }
            ErrorKind::ApiError => false,
        }
    }
}

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Process-level error type for the Scholar client
#[derive(Error, Debug)]
pub enum ScholarError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Display error: {message}")]
    View {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl ScholarError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ScholarError::Config { context, .. } => Some(context),
            ScholarError::Validation { context, .. } => Some(context),
            ScholarError::View { context, .. } => Some(context),
            ScholarError::Internal { context, .. } => Some(context),
            ScholarError::Io(_) | ScholarError::Serialization(_) => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = self.context().map(|c| c.error_id.as_str());
        match self {
            ScholarError::Config { .. } | ScholarError::Validation { .. } => {
                error!(error_id = ?error_id, error = %self, "Configuration or validation error");
            }
            ScholarError::View { .. } | ScholarError::Io(_) => {
                warn!(error_id = ?error_id, error = %self, "Display or IO error");
            }
            _ => {
                error!(error_id = ?error_id, error = %self, "Error occurred");
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::ScholarError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'scholar config --init' to create a default config"),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::ScholarError::Config {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::ScholarError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::ServiceUnavailable);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::ApiError);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::ApiError);
        assert_eq!(ErrorKind::from_status(302), ErrorKind::ApiError);
    }

    #[test]
    fn test_unknown_code_falls_back_to_api_error() {
        assert_eq!(ErrorKind::from_code("RATE_LIMIT"), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::from_code("NETWORK_ERROR"), ErrorKind::NetworkError);
        assert_eq!(ErrorKind::from_code("TEAPOT"), ErrorKind::ApiError);
        assert_eq!(ErrorKind::from_code(""), ErrorKind::ApiError);
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::RateLimited.is_retryable());
        assert!(ErrorKind::NetworkError.is_retryable());
        assert!(!ErrorKind::ApiError.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ErrorKind::RateLimited.user_message(),
            "Too many requests. Please wait a moment and try again."
        );
        assert_eq!(
            ErrorKind::NetworkError.to_string(),
            "Network error. Please check your connection and try again."
        );
        for kind in [
            ErrorKind::RateLimited,
            ErrorKind::ServiceUnavailable,
            ErrorKind::ApiError,
            ErrorKind::NetworkError,
        ] {
            assert_eq!(ErrorKind::from_code(kind.code()), kind);
        }
    }
}
