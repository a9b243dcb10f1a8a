//! Configuration System
//!
//! Layered configuration for the PRAX CLI: built-in defaults, the user's global
//! `config.toml`, `PRAX_*` environment variables, then command-line overrides.

use crate::error::ErrorInfo;
use crate::logging::LoggingConfig;
use crate::render::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

pub const DEFAULT_API_URL: &str = "https://prax.oceanum.io/api";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PraxConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the PRAX service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Bearer token issued by the PRAX service
    #[serde(default)]
    pub token: Option<String>,

    /// Organisation sent with every request
    #[serde(default)]
    pub org: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Delay between status polls while waiting on a terminate
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            token: None,
            org: None,
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Defaults for list commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            limit: default_limit(),
        }
    }
}

/// A configuration value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub key: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl PraxConfig {
    /// Validate the whole configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let url = self.api.url.trim();
        if url.is_empty() {
            errors.push(ValidationError {
                key: "api.url",
                message: "must not be empty".to_string(),
            });
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError {
                key: "api.url",
                message: format!("must be an http(s) URL, got '{}'", url),
            });
        }
        if self.api.timeout_secs == 0 {
            errors.push(ValidationError {
                key: "api.timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.output.limit == 0 {
            errors.push(ValidationError {
                key: "output.limit",
                message: "must be greater than zero".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one [`ErrorInfo`].
    pub fn ensure_valid(&self) -> Result<(), ErrorInfo> {
        self.validate().map_err(|errors| {
            let detail = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            ErrorInfo::config(format!("Invalid configuration: {}", detail))
        })
    }

    /// Apply `--api-url` / `--token` command-line overrides.
    pub fn apply_overrides(&mut self, url: Option<&str>, token: Option<&str>) {
        if let Some(url) = url {
            self.api.url = url.to_string();
        }
        if let Some(token) = token {
            self.api.token = Some(token.to_string());
        }
    }
}
