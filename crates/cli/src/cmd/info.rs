//! Implementation of `pynexe --info`.
//!
//! Prints a summary of the loaded project configuration without building.

use std::path::Path;

use anyhow::Result;

use pynexe_lib::config::{ConfigError, ProjectConfig};

use crate::output::{format_count, print_banner, print_error, print_heading, print_json, print_row};

use super::config_not_found;

const LABEL_WIDTH: usize = 16;

/// Execute the info command.
///
/// A missing config file is an error. Any other load failure is printed but
/// does not fail the command.
pub fn cmd_info(config_path: &Path, json: bool) -> Result<()> {
  if !json {
    print_banner();
  }

  let config = match ProjectConfig::load(config_path) {
    Ok(config) => config,
    Err(ConfigError::NotFound(path)) => return Err(config_not_found(&path)),
    Err(e) => {
      print_error(&format!("Failed to load project info: {}", e));
      return Ok(());
    }
  };

  if json {
    return print_json(&config);
  }

  print_heading("Project Information");
  for (label, value) in info_rows(&config) {
    print_row(label, &value, LABEL_WIDTH);
  }

  Ok(())
}

fn info_rows(config: &ProjectConfig) -> Vec<(&'static str, String)> {
  vec![
    ("Project Name", config.project_name.clone()),
    ("Main File", config.main_file.display().to_string()),
    ("Output Name", config.output_name.clone()),
    (
      "Icon File",
      config
        .icon_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "None".to_string()),
    ),
    ("Dependencies", format_count(config.dependency_count(), "libraries")),
    ("Include Packages", format_count(config.package_count(), "packages")),
  ]
}
