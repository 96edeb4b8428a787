mod build;
mod help;
mod info;

use std::path::Path;

use anyhow::{Result, anyhow};

use pynexe_lib::config::{ConfigError, ProjectConfig};
use pynexe_lib::consts::DEFAULT_CONFIG_FILE;

pub use build::cmd_build;
pub use help::cmd_help;
pub use info::cmd_info;

/// The error shown when the config file does not exist.
fn config_not_found(path: &Path) -> anyhow::Error {
  anyhow!(
    "Config file not found: {}\nCreate {} with your project settings",
    path.display(),
    DEFAULT_CONFIG_FILE
  )
}

/// Load the project config, turning a missing file into the CLI's not-found error.
fn load_config(path: &Path) -> Result<ProjectConfig> {
  match ProjectConfig::load(path) {
    Ok(config) => Ok(config),
    Err(ConfigError::NotFound(path)) => Err(config_not_found(&path)),
    Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to load {}", path.display()))),
  }
}
