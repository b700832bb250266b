//! Unified logging system
//!
//! Structured logging via `tracing`. Log output never goes to stdout, which
//! belongs to the chat transcript.

use crate::error::{ErrorContext, ScholarError, ScholarResult};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Whether to include file and line information
    pub include_location: bool,
    /// Whether to include thread information
    pub include_thread: bool,
    /// Whether to log to file instead of stderr
    pub log_to_file: bool,
    /// Log file path (if log_to_file is true)
    pub log_file_path: Option<String>,
    /// Custom filter directives
    pub filter_directives: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            include_location: false,
            include_thread: false,
            log_to_file: false,
            log_file_path: None,
            filter_directives: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Debug-level logging for the scholar crates
    pub fn verbose() -> Self {
        Self {
            level: "info".to_string(),
            include_location: true,
            filter_directives: vec![
                "scholar=debug".to_string(),
                "scholar_core=debug".to_string(),
                "scholar_chat=debug".to_string(),
            ],
            ..Default::default()
        }
    }
}

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> ScholarResult<()> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    for directive in &config.filter_directives {
        let directive = directive.parse().map_err(|e| ScholarError::Config {
            message: format!("Invalid log filter directive '{}'", directive),
            source: Some(Box::new(e)),
            context: ErrorContext::new("logging").with_operation("parse_directive"),
        })?;
        filter = filter.add_directive(directive);
    }

    let writer = make_writer(config)?;
    let layer: Box<dyn Layer<FilteredRegistry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread)
            .with_thread_names(config.include_thread)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(!config.log_to_file)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread)
            .with_thread_names(config.include_thread)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(!config.log_to_file)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread)
            .with_thread_names(config.include_thread)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| ScholarError::Internal {
            message: format!("Failed to install log subscriber: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("logging").with_operation("init"),
        })
}

fn make_writer(config: &LoggingConfig) -> ScholarResult<BoxMakeWriter> {
    if !config.log_to_file {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    }

    let path = config.log_file_path.as_ref().ok_or_else(|| ScholarError::Config {
        message: "log_file_path must be specified when log_to_file is true".to_string(),
        source: None,
        context: ErrorContext::new("logging").with_operation("open_log_file"),
    })?;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

/// Performance monitoring utilities
pub mod performance {
    use std::time::Instant;
    use tracing::{info_span, Instrument};

    /// Measure and log execution time of an async operation
    pub async fn measure_async<F, T>(operation_name: &str, future: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let span = info_span!("performance", operation = operation_name);
        let start = Instant::now();

        let result = future.instrument(span).await;

        tracing::debug!(
            target: "performance",
            operation = operation_name,
            duration_ms = start.elapsed().as_millis() as u64,
            "Operation completed"
        );

        result
    }
}

/// Logging macros for common patterns
#[macro_export]
macro_rules! log_operation_start {
    ($operation:expr) => {
        $crate::tracing::info!(
            operation = $operation,
            "Starting operation"
        );
    };
    ($operation:expr, $($field:tt)*) => {
        $crate::tracing::info!(
            operation = $operation,
            $($field)*,
            "Starting operation"
        );
    };
}

#[macro_export]
macro_rules! log_operation_success {
    ($operation:expr) => {
        $crate::tracing::info!(
            operation = $operation,
            "Operation completed successfully"
        );
    };
    ($operation:expr, $($field:tt)*) => {
        $crate::tracing::info!(
            operation = $operation,
            $($field)*,
            "Operation completed successfully"
        );
    };
}

#[macro_export]
macro_rules! log_operation_error {
    ($operation:expr, $error:expr) => {
        $crate::tracing::error!(
            operation = $operation,
            error = %$error,
            "Operation failed"
        );
    };
    ($operation:expr, $error:expr, $($field:tt)*) => {
        $crate::tracing::error!(
            operation = $operation,
            error = %$error,
            $($field)*,
            "Operation failed"
        );
    };
}
