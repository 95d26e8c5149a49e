//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, KNOWN_PROVIDERS};

/// Shortest post-mark pause that still lets the host page catch up.
const MIN_AFTER_MARK_READ_MS: u64 = 500;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// The warnings, or the first error as a [`ConfigError::InvalidValue`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_providers(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let endpoint = config.browser.endpoint.trim();
        if endpoint.is_empty() {
            result.add_error(ValidationError::new(
                "browser.endpoint",
                "Endpoint cannot be empty",
            ));
        } else if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "browser.endpoint",
                "Endpoint must start with http:// or https://",
            ));
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;

        if timing.confirm_attempts == 0 {
            result.add_error(ValidationError::new(
                "timing.confirm_attempts",
                "confirm_attempts must be greater than 0",
            ));
        }

        if timing.ready_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "timing.ready_timeout_ms",
                "ready_timeout_ms must be greater than 0",
            ));
        }

        if timing.after_mark_read_ms < MIN_AFTER_MARK_READ_MS {
            result.add_warning(ValidationWarning::new(
                "timing.after_mark_read_ms",
                format!(
                    "after_mark_read_ms is below {}ms; the page may not finish marking before deselect",
                    MIN_AFTER_MARK_READ_MS
                ),
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        let mut names: Vec<&String> = config.providers.keys().collect();
        names.sort();
        for name in names {
            if !KNOWN_PROVIDERS.contains(&name.as_str()) {
                result.add_error(ValidationError::new(
                    format!("providers.{}", name),
                    format!(
                        "Unknown provider '{}', valid values: {:?}",
                        name, KNOWN_PROVIDERS
                    ),
                ));
                continue;
            }

            let provider = &config.providers[name];
            if name != "gmail" && provider.select_scope.is_some() {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}.select_scope", name),
                    "select_scope only applies to gmail and is ignored here",
                ));
            }
        }

        if KNOWN_PROVIDERS
            .iter()
            .all(|name| !config.provider(name).enabled)
        {
            result.add_warning(ValidationWarning::new(
                "providers",
                "Every provider is disabled; no page will match",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
