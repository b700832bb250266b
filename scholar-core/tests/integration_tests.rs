//! Integration tests for scholar-core infrastructure

use scholar_core::{
    config_error, init_logging, validation_error, ApiConfig, ErrorContext, LogFormat,
    LoggingConfig, ScholarConfig, ScholarError, DEFAULT_API_URL,
};
use tempfile::TempDir;

#[test]
fn test_error_handling() {
    let error = config_error!("Invalid config", "test_component");

    match &error {
        ScholarError::Config {
            message, context, ..
        } => {
            assert_eq!(message, "Invalid config");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
            assert!(!context.recovery_suggestions.is_empty());
        }
        _ => panic!("Expected Config error"),
    }

    // Logging an error must not panic without a subscriber
    error.log();

    let error = validation_error!("must not be empty", "query", "controller");
    match &error {
        ScholarError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("query")),
        _ => panic!("Expected Validation error"),
    }

    let io_error: ScholarError = std::io::Error::other("broken pipe").into();
    assert!(io_error.context().is_none());
}

#[test]
fn test_error_context_builder() {
    let context = ErrorContext::new("client")
        .with_operation("send")
        .with_metadata("status", "429")
        .with_suggestion("Wait a moment");

    assert_eq!(context.operation.as_deref(), Some("send"));
    assert_eq!(context.metadata.get("status").map(String::as_str), Some("429"));
    assert_eq!(context.recovery_suggestions, vec!["Wait a moment".to_string()]);
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    let mut config = ScholarConfig::default();
    config.api = ApiConfig::new("http://localhost:8001").with_timeout(30);
    config.chat.working_status = "Searching the papers...".to_string();

    config.save_to_file(&path).unwrap();
    let loaded = ScholarConfig::from_file(&path).unwrap();

    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("scholar.toml");
    std::fs::write(&path, "[chat]\nworking_status = \"Working\"\n").unwrap();

    let loaded = ScholarConfig::from_file(&path).unwrap();
    assert_eq!(loaded.api.base_url, DEFAULT_API_URL);
    assert_eq!(loaded.chat.working_status, "Working");
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[api\nbase_url = ").unwrap();

    assert!(matches!(
        ScholarConfig::from_file(&path),
        Err(ScholarError::Config { .. })
    ));
    assert!(ScholarConfig::from_file(temp_dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_logging_initialization() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Compact,
        include_location: false,
        include_thread: false,
        log_to_file: false,
        log_file_path: None,
        filter_directives: vec!["scholar_core=debug".to_string()],
    };

    // Only one global subscriber per process; a second install reports an error
    let first = init_logging(&config);
    assert!(first.is_ok());
    assert!(init_logging(&config).is_err());
}

#[test]
fn test_logging_requires_file_path() {
    let config = LoggingConfig {
        log_to_file: true,
        log_file_path: None,
        ..Default::default()
    };

    assert!(matches!(
        init_logging(&config),
        Err(ScholarError::Config { .. })
    ));
}
