//! Merge rules: defaults, override order, conflict handling.

use super::super::DEFAULT_API_URL;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("api.url", DEFAULT_API_URL)?
        .set_default("api.timeout_secs", 60)?
        .set_default("api.poll_interval_ms", 2000)?
        .set_default("output.format", "table")?
        .set_default("output.limit", 100)
}
