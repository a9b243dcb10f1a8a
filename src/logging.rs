//! Logging System
//!
//! Structured diagnostics using the `tracing` crate. Command output goes to
//! stdout, so logs default to stderr at `warn` and can be redirected to a file.

use crate::error::ErrorInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable to suppress all diagnostics
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output is "file"); defaults to the platform data dir
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format on stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

/// Default log file: `<data dir>/prax/prax.log`.
pub fn default_log_file() -> PathBuf {
    directories::ProjectDirs::from("io", "oceanum", "prax")
        .map(|dirs| dirs.data_local_dir().join("prax.log"))
        .unwrap_or_else(|| PathBuf::from("prax.log"))
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (PRAX_LOG, PRAX_LOG_FORMAT, PRAX_LOG_OUTPUT)
/// 2. CLI flags, already folded into `config` by the binary
/// 3. Configuration file
/// 4. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), ErrorInfo> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let base_subscriber = Registry::default().with(filter);

    let result = match (format, output) {
        (LogFormat::Json, LogOutput::File) => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::sync::Mutex::new(open_log_file(config)?)),
            )
            .try_init(),
        (LogFormat::Json, LogOutput::Stderr) => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (LogFormat::Text, LogOutput::File) => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(open_log_file(config)?)),
            )
            .try_init(),
        (LogFormat::Text, LogOutput::Stderr) => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| ErrorInfo::config(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, ErrorInfo> {
    let log_file = config.file.clone().unwrap_or_else(default_log_file);
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ErrorInfo::config(format!("Failed to create log directory: {}", e)))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            ErrorInfo::config(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ErrorInfo> {
    if let Ok(filter) = EnvFilter::try_from_env("PRAX_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ErrorInfo::config(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Stderr,
    File,
}

/// Determine output format from config or environment
fn determine_format(config: &LoggingConfig) -> Result<LogFormat, ErrorInfo> {
    let format = std::env::var("PRAX_LOG_FORMAT").unwrap_or_else(|_| config.format.clone());
    parse_format(&format)
}

fn parse_format(format: &str) -> Result<LogFormat, ErrorInfo> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(ErrorInfo::config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Determine output destination from config or environment
fn determine_output(config: &LoggingConfig) -> Result<LogOutput, ErrorInfo> {
    let output = std::env::var("PRAX_LOG_OUTPUT").unwrap_or_else(|_| config.output.clone());
    parse_output(&output)
}

fn parse_output(output: &str) -> Result<LogOutput, ErrorInfo> {
    match output {
        "stderr" => Ok(LogOutput::Stderr),
        "file" => Ok(LogOutput::File),
        other => Err(ErrorInfo::config(format!(
            "Invalid log output: {} (must be 'stderr' or 'file')",
            other
        ))),
    }
}
