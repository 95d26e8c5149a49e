//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use readall_core::{SelectScope, Timings};

use crate::loader::ConfigLoader;

/// Provider keys accepted under `[providers.*]`, in registry order.
pub const KNOWN_PROVIDERS: &[&str] = &["gmail", "outlook", "yahoo"];

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Settings for `name`; absent sections mean "enabled with defaults".
    pub fn provider(&self, name: &str) -> ProviderConfig {
        self.providers.get(name).cloned().unwrap_or_default()
    }
}

/// Browser connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// URL substring narrowing which tab is driven.
    #[serde(default)]
    pub target: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            target: String::new(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9222".to_string()
}

/// Named pauses and bounds, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_after_select_ms")]
    pub after_select_ms: u64,

    #[serde(default = "default_after_mark_read_ms")]
    pub after_mark_read_ms: u64,

    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,

    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: u32,

    #[serde(default = "default_confirm_interval_ms")]
    pub confirm_interval_ms: u64,

    #[serde(default = "default_dialog_poll_attempts")]
    pub dialog_poll_attempts: u32,

    #[serde(default = "default_dialog_poll_interval_ms")]
    pub dialog_poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            after_select_ms: default_after_select_ms(),
            after_mark_read_ms: default_after_mark_read_ms(),
            ready_timeout_ms: default_ready_timeout_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            confirm_attempts: default_confirm_attempts(),
            confirm_interval_ms: default_confirm_interval_ms(),
            dialog_poll_attempts: default_dialog_poll_attempts(),
            dialog_poll_interval_ms: default_dialog_poll_interval_ms(),
        }
    }
}

impl TimingConfig {
    /// Engine timings; pauses not exposed here keep their defaults.
    pub fn to_timings(&self) -> Timings {
        Timings {
            after_select: Duration::from_millis(self.after_select_ms),
            after_mark_read: Duration::from_millis(self.after_mark_read_ms),
            ready_timeout: Duration::from_millis(self.ready_timeout_ms),
            wait_timeout: Duration::from_millis(self.wait_timeout_ms),
            confirm_attempts: self.confirm_attempts,
            confirm_interval: Duration::from_millis(self.confirm_interval_ms),
            dialog_poll_attempts: self.dialog_poll_attempts,
            dialog_poll_interval: Duration::from_millis(self.dialog_poll_interval_ms),
            ..Timings::default()
        }
    }
}

fn default_after_select_ms() -> u64 {
    500
}

fn default_after_mark_read_ms() -> u64 {
    2000
}

fn default_ready_timeout_ms() -> u64 {
    5000
}

fn default_wait_timeout_ms() -> u64 {
    10_000
}

fn default_confirm_attempts() -> u32 {
    10
}

fn default_confirm_interval_ms() -> u64 {
    200
}

fn default_dialog_poll_attempts() -> u32 {
    5
}

fn default_dialog_poll_interval_ms() -> u64 {
    200
}

/// Per-provider switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Select-all scope; only Gmail offers both.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_scope: Option<SelectScope>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            select_scope: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for the daily-rolling log file.
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: default_log_directory(),
        }
    }
}

impl LoggingConfig {
    /// `directory` with `~` expanded.
    pub fn directory_path(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.directory))
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "~/.readall/debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.browser.endpoint, "http://127.0.0.1:9222");
        assert!(config.browser.target.is_empty());
        assert_eq!(config.timing.after_mark_read_ms, 2000);
        assert_eq!(config.logging.level, "info");
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_default_timings_match_engine() {
        assert_eq!(TimingConfig::default().to_timings(), Timings::default());
    }

    #[test]
    fn test_to_timings_overrides() {
        let timing = TimingConfig {
            after_select_ms: 750,
            confirm_attempts: 3,
            ..TimingConfig::default()
        };
        let timings = timing.to_timings();
        assert_eq!(timings.after_select, Duration::from_millis(750));
        assert_eq!(timings.confirm_attempts, 3);
        assert_eq!(timings.toggle_recheck, Timings::default().toggle_recheck);
    }

    #[test]
    fn test_missing_provider_is_enabled() {
        let config = Config::default();
        let gmail = config.provider("gmail");
        assert!(gmail.enabled);
        assert_eq!(gmail.select_scope, None);
    }

    #[test]
    fn test_log_directory_expanded() {
        let logging = LoggingConfig::default();
        let path = logging.directory_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with(".readall/debug"));
    }
}
