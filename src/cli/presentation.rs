//! CLI presentation: status symbols and value formatters used by field lists.

use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Stream};
use serde_json::Value;

/// Status-line symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Check,
    Error,
    Warning,
    Info,
    Spin,
}

impl Symbol {
    /// Uncoloured glyph, safe inside table cells.
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Check => "✔",
            Symbol::Error => "✘",
            Symbol::Warning => "⚠",
            Symbol::Info => "ℹ",
            Symbol::Spin => "⟳",
        }
    }

    /// Glyph coloured when the given stream supports it.
    pub fn styled(self, stream: Stream) -> String {
        let glyph = self.glyph();
        match self {
            Symbol::Check => glyph.if_supports_color(stream, |t| t.green()).to_string(),
            Symbol::Error => glyph.if_supports_color(stream, |t| t.red()).to_string(),
            Symbol::Warning => glyph.if_supports_color(stream, |t| t.yellow()).to_string(),
            Symbol::Info => glyph.if_supports_color(stream, |t| t.blue()).to_string(),
            Symbol::Spin => glyph.if_supports_color(stream, |t| t.cyan()).to_string(),
        }
    }
}

/// `"<symbol> <message>"` for stdout.
pub fn status_line(symbol: Symbol, message: impl AsRef<str>) -> String {
    format!("{} {}", symbol.styled(Stream::Stdout), message.as_ref())
}

pub const NOT_AVAILABLE: &str = "N/A";

/// RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS UTC`; `null` becomes `N/A`,
/// unparseable text passes through.
pub fn format_dt(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(NOT_AVAILABLE.to_string()),
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Value::String(
                dt.with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string(),
            ),
            Err(_) => value.clone(),
        },
        other => other.clone(),
    }
}

/// Route status prefixed with a symbol describing its health.
pub fn format_route_status(value: &Value) -> Value {
    let Some(status) = value.as_str() else {
        return value.clone();
    };
    let symbol = match status.to_ascii_lowercase().as_str() {
        "active" | "ready" | "running" | "healthy" => Symbol::Check,
        "pending" | "building" | "deploying" | "updating" | "progressing" => Symbol::Spin,
        "error" | "failed" | "degraded" | "unhealthy" => Symbol::Error,
        _ => Symbol::Warning,
    };
    Value::String(format!("{} {}", symbol.glyph(), status))
}

/// `[suspended, schedule]` composite to a single schedule cell.
pub fn format_schedule(values: Vec<Value>) -> Vec<Value> {
    let cell = values.first().and_then(|v| v.as_array()).and_then(|pair| {
        match pair.as_slice() {
            [suspended, Value::String(schedule)] => {
                let symbol = if suspended.as_bool().unwrap_or(false) {
                    Symbol::Error
                } else {
                    Symbol::Spin
                };
                Some(format!("{} {}", symbol.glyph(), schedule))
            }
            _ => None,
        }
    });
    vec![Value::String(
        cell.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    )]
}

/// Attribute of an optional nested record, `N/A` when the record is `null`.
pub fn nested_or_na(key: &'static str) -> impl Fn(&Value) -> Value + Send + Sync + 'static {
    move |value| match value {
        Value::Null => Value::String(NOT_AVAILABLE.to_string()),
        record => record.get(key).cloned().unwrap_or(Value::Null),
    }
}
