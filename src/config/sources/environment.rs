//! Environment source: `PRAX_API__TOKEN`, `PRAX_OUTPUT__LIMIT`, ...

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "PRAX";

/// Add `PRAX_`-prefixed variables; `__` separates nested keys.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    )
}
