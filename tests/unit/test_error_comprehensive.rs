use flowsmith::core::error::AppError;
use flowsmith::core::types::{ErrorCategory, ErrorSeverity};

#[test]
fn test_error_creation_all_categories() {
    let categories = vec![
        ErrorCategory::ValidationError,
        ErrorCategory::SerializationError,
        ErrorCategory::ConfigError,
        ErrorCategory::IoError,
        ErrorCategory::InternalError,
        ErrorCategory::Unknown,
    ];

    for category in categories {
        let error = AppError::new(category, "test message");
        assert_eq!(error.category, category);
        assert_eq!(error.message, "test message");
        assert_eq!(error.context.len(), 0);
        assert_eq!(error.recovery_suggestions.len(), 0);
        assert!(error.occurred_at <= chrono::Utc::now());
        assert!(error.source.is_none());
    }
}

#[test]
fn test_error_severity_mapping() {
    let test_cases = vec![
        (ErrorCategory::ValidationError, ErrorSeverity::Error),
        (ErrorCategory::SerializationError, ErrorSeverity::Error),
        (ErrorCategory::ConfigError, ErrorSeverity::Error),
        (ErrorCategory::IoError, ErrorSeverity::Error),
        (ErrorCategory::InternalError, ErrorSeverity::Error),
        (ErrorCategory::Unknown, ErrorSeverity::Info),
    ];

    for (category, expected_severity) in test_cases {
        let error = AppError::new(category, "test");
        assert_eq!(error.severity(), expected_severity);
    }
}

#[test]
fn test_error_add_context() {
    let mut error = AppError::new(ErrorCategory::ValidationError, "parameters missing");

    error.add_context("task_id", "t-42");
    error.add_context("step", "2");

    assert_eq!(error.context.len(), 2);
    assert_eq!(error.context.get("task_id"), Some(&"t-42".to_string()));
    assert_eq!(error.context.get("step"), Some(&"2".to_string()));
}

#[test]
fn test_error_builders_chain() {
    let error = AppError::new(ErrorCategory::ConfigError, "bad capacity")
        .with_code("CFG-VALID-001")
        .with_context("flowsmith.toml")
        .with_suggestion("Set cache.capacity to 1 or more");

    assert_eq!(error.code, "CFG-VALID-001");
    assert_eq!(
        error.context.get("context"),
        Some(&"flowsmith.toml".to_string())
    );
    assert_eq!(error.recovery_suggestions.len(), 1);

    let rendered = error.to_string();
    assert!(rendered.starts_with("[CFG-VALID-001] ConfigError: bad capacity"));
    assert!(rendered.contains("flowsmith.toml"));
}

#[test]
fn test_generated_codes_are_unique() {
    let first = AppError::new(ErrorCategory::InternalError, "a");
    let second = AppError::new(ErrorCategory::InternalError, "a");
    assert!(first.code.starts_with("ERR-"));
    assert_ne!(first.code, second.code);
}

#[test]
fn test_with_source_is_reported() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "task.json missing");
    let error = AppError::with_source(ErrorCategory::IoError, "cannot load task", Box::new(io));

    assert!(error.source.is_some());
    assert!(error.to_string().contains("Caused by: task.json missing"));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: AppError = io.into();
    assert_eq!(error.category, ErrorCategory::IoError);
    assert_eq!(error.code, "IO_ERROR");
    assert!(!error.recovery_suggestions.is_empty());
}

#[test]
fn test_anyhow_error_conversion() {
    let error: AppError = anyhow::anyhow!("unexpected state").into();
    assert_eq!(error.category, ErrorCategory::InternalError);
    assert_eq!(error.code, "ANYHOW_ERROR");
    assert_eq!(error.message, "unexpected state");
}

#[test]
fn test_app_error_converts_into_anyhow() {
    fn fails() -> flowsmith::Result<()> {
        Err(AppError::new(ErrorCategory::ValidationError, "Task is required")
            .with_code("PIPE-TASK-001"))?;
        Ok(())
    }

    let err = fails().unwrap_err();
    assert!(err.to_string().contains("PIPE-TASK-001"));
    assert!(err.downcast_ref::<AppError>().is_some());
}
