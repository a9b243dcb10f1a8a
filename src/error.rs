//! Error types and the result protocol shared by the remote client and the
//! command handlers.
//!
//! Every remote-call wrapper returns [`ApiResult<T>`]. Local precondition
//! failures (bad `key=value` arguments, missing runs) use the same
//! [`ErrorInfo`] shape so handlers print them identically.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result of every call into the PRAX API.
pub type ApiResult<T> = Result<T, ErrorInfo>;

/// Where an error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The service answered with a non-success status.
    Remote,
    /// The request never produced a response (connect, timeout, TLS).
    Transport,
    /// A response arrived but its body could not be decoded.
    Decode,
    /// A check performed locally before or instead of a remote call.
    Precondition,
    /// Configuration could not be loaded or is invalid.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Remote => "remote",
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Config => "config",
        };
        f.write_str(s)
    }
}

/// A single field-level validation failure as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub loc: Vec<LocPart>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One component of a validation error location (`["body", "parameters", 0]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocPart {
    Key(String),
    Index(u64),
}

impl fmt::Display for LocPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocPart::Key(k) => f.write_str(k),
            LocPart::Index(i) => write!(f, "{}", i),
        }
    }
}

impl FieldError {
    /// Location joined with dots, e.g. `body.parameters.region`.
    pub fn location(&self) -> String {
        self.loc
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Structured error payload carried by the `Err` arm of [`ApiResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{detail}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            status: None,
            errors: Vec::new(),
        }
    }

    pub fn remote(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorKind::Remote, detail)
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, detail)
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, detail)
    }

    pub fn precondition(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition, detail)
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, detail)
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl From<config::ConfigError> for ErrorInfo {
    fn from(err: config::ConfigError) -> Self {
        ErrorInfo::config(err.to_string())
    }
}

impl From<std::io::Error> for ErrorInfo {
    fn from(err: std::io::Error) -> Self {
        ErrorInfo::precondition(err.to_string())
    }
}

/// Failure of a single command invocation: what the command was doing plus
/// the underlying error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{context}: {info}")]
pub struct CommandError {
    pub context: String,
    #[source]
    pub info: ErrorInfo,
}

impl CommandError {
    pub fn new(context: impl Into<String>, info: ErrorInfo) -> Self {
        Self {
            context: context.into(),
            info,
        }
    }
}

/// Attach command context to an [`ApiResult`].
pub trait Context<T> {
    fn context(self, context: impl Into<String>) -> Result<T, CommandError>;
}

impl<T> Context<T> for ApiResult<T> {
    fn context(self, context: impl Into<String>) -> Result<T, CommandError> {
        self.map_err(|info| CommandError::new(context, info))
    }
}
