//! Console configuration parsing, validation, and environment overrides.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::{AppError, Result};

/// Environment variable that overrides `service.base_url`.
pub const SERVICE_URL_ENV: &str = "EHR_ACCESS_SERVICE_URL";

/// Connection settings for the policy decision service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ServiceConfig {
    /// Scheme, host and port of the policy decision service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the evaluate-access endpoint.
    #[serde(default = "default_evaluate_path")]
    pub evaluate_path: String,
    /// Path of the audit-log endpoint.
    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: String,
    /// HTTP client timeout; 0 means no client-side timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_evaluate_path() -> String {
    "/evaluate".into()
}

fn default_audit_log_path() -> String {
    "/audit-logs".into()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            evaluate_path: default_evaluate_path(),
            audit_log_path: default_audit_log_path(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ServiceConfig {
    /// Full URL of the evaluate-access endpoint.
    #[must_use]
    pub fn evaluate_url(&self) -> String {
        join_url(&self.base_url, &self.evaluate_path)
    }

    /// Full URL of the audit-log endpoint.
    #[must_use]
    pub fn audit_log_url(&self) -> String {
        join_url(&self.base_url, &self.audit_log_path)
    }

    /// Client timeout, or `None` when disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

/// Top-level configuration parsed from `console.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ConsoleConfig {
    /// Policy decision service settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

impl ConsoleConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace settings with values from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the overridden configuration is invalid.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var(SERVICE_URL_ENV) {
            if !url.trim().is_empty() {
                info!(env = SERVICE_URL_ENV, "service base url overridden from environment");
                self.service.base_url = url.trim().to_owned();
            }
        }
        self.validate()
    }

    /// Validate service addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` on a non-http(s) base URL or a path
    /// without a leading slash.
    pub fn validate(&self) -> Result<()> {
        let base = &self.service.base_url;
        let host = base
            .strip_prefix("http://")
            .or_else(|| base.strip_prefix("https://"))
            .ok_or_else(|| {
                AppError::Config(format!("service.base_url must be http or https: {base}"))
            })?;
        if host.trim_matches('/').is_empty() {
            return Err(AppError::Config("service.base_url has no host".into()));
        }

        for (name, path) in [
            ("evaluate_path", &self.service.evaluate_path),
            ("audit_log_path", &self.service.audit_log_path),
        ] {
            if !path.starts_with('/') {
                return Err(AppError::Config(format!(
                    "service.{name} must start with '/': {path}"
                )));
            }
        }

        Ok(())
    }
}
