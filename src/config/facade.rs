//! Config loading facade.

use super::merge::merge_policy;
use super::sources::{environment, global_file};
use super::PraxConfig;
use crate::error::ErrorInfo;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;
use tracing::debug;

/// Loads [`PraxConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global config file, then `PRAX_*` variables.
    pub fn load() -> Result<PraxConfig, ErrorInfo> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        Self::finish(environment::add_to_builder(builder))
    }

    /// Defaults, then `path` (which must exist), then `PRAX_*` variables.
    pub fn load_from_file(path: &Path) -> Result<PraxConfig, ErrorInfo> {
        if !path.exists() {
            return Err(ErrorInfo::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        debug!(config_path = %path.display(), "Loading configuration file");
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        Self::finish(environment::add_to_builder(builder))
    }

    /// Load from `path` when given, otherwise from the default sources.
    pub fn load_with(path: Option<&Path>) -> Result<PraxConfig, ErrorInfo> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<PraxConfig, ErrorInfo> {
        let config: PraxConfig = builder.build()?.try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }
}
