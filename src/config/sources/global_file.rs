//! Global config file source: $XDG_CONFIG_HOME/prax/config.toml, falling back to
//! the platform config directory (~/.config/prax/config.toml on Linux).

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => directories::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()),
    };
    base.map(|dir| dir.join("prax").join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.exists() {
            debug!(config_path = %path.display(), "Loading global configuration");
            builder = builder.add_source(File::from(path.as_path()).required(false));
        } else {
            debug!(
                config_path = %path.display(),
                "No global configuration file, using defaults"
            );
        }
    }
    Ok(builder)
}
