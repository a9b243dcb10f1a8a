//! CLI output: command errors as printed on stderr.

use crate::cli::presentation::Symbol;
use crate::error::CommandError;
use owo_colors::Stream;

/// `⚠ <context>:` followed by the indented detail and any field-level
/// validation failures, one per line.
pub fn format_command_error(err: &CommandError) -> String {
    let mut out = format!(
        "{} {}:\n  {}",
        Symbol::Warning.styled(Stream::Stderr),
        err.context,
        err.info.detail
    );
    for field in &err.info.errors {
        let location = field.location();
        if location.is_empty() {
            out.push_str(&format!("\n  - {}", field.msg));
        } else {
            out.push_str(&format!("\n  - {}: {}", location, field.msg));
        }
    }
    out
}
