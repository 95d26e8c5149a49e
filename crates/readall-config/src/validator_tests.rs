use super::*;
use crate::schema::ProviderConfig;
use readall_core::SelectScope;

fn disabled() -> ProviderConfig {
    ProviderConfig {
        enabled: false,
        select_scope: None,
    }
}

#[test]
fn test_validate_default_config() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_empty_endpoint() {
    let mut config = Config::default();
    config.browser.endpoint = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.endpoint"));
}

#[test]
fn test_validate_non_http_endpoint() {
    let mut config = Config::default();
    config.browser.endpoint = "ws://127.0.0.1:9222".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors[0].message.contains("http://"));
}

#[test]
fn test_validate_zero_confirm_attempts() {
    let mut config = Config::default();
    config.timing.confirm_attempts = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "timing.confirm_attempts"));
}

#[test]
fn test_validate_zero_ready_timeout() {
    let mut config = Config::default();
    config.timing.ready_timeout_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "timing.ready_timeout_ms"));
}

#[test]
fn test_validate_short_mark_read_pause_warning() {
    let mut config = Config::default();
    config.timing.after_mark_read_ms = 100;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "timing.after_mark_read_ms"));
}

#[test]
fn test_validate_unknown_provider() {
    let mut config = Config::default();
    config
        .providers
        .insert("hotmail".to_string(), ProviderConfig::default());

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].path, "providers.hotmail");
}

#[test]
fn test_validate_scope_on_non_gmail_warns() {
    let mut config = Config::default();
    config.providers.insert(
        "outlook".to_string(),
        ProviderConfig {
            enabled: true,
            select_scope: Some(SelectScope::FullHistory),
        },
    );

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings[0].path, "providers.outlook.select_scope");
}

#[test]
fn test_validate_all_disabled_warning() {
    let mut config = Config::default();
    for name in KNOWN_PROVIDERS {
        config.providers.insert(name.to_string(), disabled());
    }

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "providers"));
}

#[test]
fn test_validate_some_disabled_is_fine() {
    let mut config = Config::default();
    config.providers.insert("yahoo".to_string(), disabled());

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_into_result_surfaces_first_error() {
    let mut config = Config::default();
    config.browser.endpoint = String::new();
    config.timing.confirm_attempts = 0;

    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    match err {
        ConfigError::InvalidValue { field, .. } => assert_eq!(field, "browser.endpoint"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_into_result_passes_warnings() {
    let mut config = Config::default();
    config.timing.after_mark_read_ms = 0;

    let warnings = ConfigValidator::validate(&config).into_result().unwrap();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_validation_result_add() {
    let mut result = ValidationResult::default();
    result.add_warning(ValidationWarning::new("test", "warning"));
    assert!(result.is_valid());
    result.add_error(ValidationError::new("test", "error"));
    assert!(!result.is_valid());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.warnings.len(), 1);
}
