//! Project configuration loading.
//!
//! A project is described by a YAML file (by default `config.yaml`). Loading
//! validates the required fields up front, so a [`ProjectConfig`] is always fully
//! populated; optional keys fall back to empty or absent values.

pub mod types;

use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::DEFAULT_BUILD_LIBS;

pub use types::{DependencySpec, InvalidDependency, WindowsMetadata};

/// Errors that can occur while loading a project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The config file does not exist.
  #[error("config file not found: {}", .0.display())]
  NotFound(PathBuf),

  /// The config file exists but could not be read.
  #[error("failed to read config file {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Required fields are missing, or a value is malformed.
  #[error("invalid config: {0}")]
  Invalid(String),
}

/// One buildable project, as declared in its config file.
///
/// Paths are kept as written; use [`ProjectConfig::resolve`] to anchor them to the
/// directory that contains the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
  pub project_name: String,
  pub main_file: PathBuf,
  pub output_name: String,
  pub icon_file: Option<PathBuf>,
  pub project_libs: Vec<DependencySpec>,
  pub include_packages: BTreeSet<String>,
  pub build_libs: Vec<DependencySpec>,
  pub include_data_dirs: Vec<String>,
  pub nuitka_plugins: Vec<String>,
  pub nuitka_extra_args: Vec<String>,
  pub windows_metadata: Option<WindowsMetadata>,
  pub cleanup_items: Vec<PathBuf>,
  pub output_dir: Option<PathBuf>,
  pub python: Option<PathBuf>,
  /// Directory containing the config file.
  pub base_dir: PathBuf,
}

/// The file as written, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
  project_name: Option<String>,
  main_file: Option<String>,
  output_name: Option<String>,
  icon_file: Option<PathBuf>,
  project_libs: Option<Vec<DependencySpec>>,
  include_packages: Option<Vec<String>>,
  build_libs: Option<Vec<DependencySpec>>,
  include_data_dirs: Option<Vec<String>>,
  nuitka_plugins: Option<Vec<String>>,
  nuitka_extra_args: Option<Vec<String>>,
  windows_metadata: Option<WindowsMetadata>,
  cleanup_items: Option<Vec<PathBuf>>,
  output_dir: Option<PathBuf>,
  python: Option<PathBuf>,
}

const REQUIRED_FIELDS: [&str; 3] = ["project_name", "main_file", "output_name"];

impl ProjectConfig {
  /// Load and validate a project config file.
  ///
  /// # Errors
  ///
  /// - [`ConfigError::NotFound`] if `path` does not exist
  /// - [`ConfigError::Read`] if it cannot be read
  /// - [`ConfigError::Invalid`] if it is not valid YAML, a value has the wrong
  ///   shape, or any required field is missing or empty
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    debug!(path = %path.display(), "loading project config");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let parent = match path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p,
      _ => Path::new("."),
    };
    let base_dir = dunce::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());

    Self::from_yaml_str(&content, &base_dir)
  }

  /// Parse and validate config content, anchoring relative paths at `base_dir`.
  pub fn from_yaml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
    let raw: RawConfig = if content.trim().is_empty() {
      RawConfig::default()
    } else {
      serde_yaml::from_str::<Option<RawConfig>>(content)
        .map_err(|e| ConfigError::Invalid(e.to_string()))?
        .unwrap_or_default()
    };

    Self::validate(raw, base_dir)
  }

  fn validate(raw: RawConfig, base_dir: &Path) -> Result<Self, ConfigError> {
    let required = [&raw.project_name, &raw.main_file, &raw.output_name];
    let missing: Vec<&str> = REQUIRED_FIELDS
      .iter()
      .zip(required)
      .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
      .map(|(name, _)| *name)
      .collect();

    if !missing.is_empty() {
      return Err(ConfigError::Invalid(format!(
        "missing required fields: {}",
        missing.join(", ")
      )));
    }

    let cleanup_items = raw.cleanup_items.unwrap_or_default();
    if let Some(bad) = cleanup_items.iter().find(|p| !is_project_relative(p)) {
      return Err(ConfigError::Invalid(format!(
        "cleanup item must be a relative path inside the project: {}",
        bad.display()
      )));
    }

    let build_libs = raw
      .build_libs
      .unwrap_or_else(|| DEFAULT_BUILD_LIBS.iter().map(|name| DependencySpec::new(*name)).collect());

    Ok(Self {
      project_name: raw.project_name.unwrap_or_default(),
      main_file: PathBuf::from(raw.main_file.unwrap_or_default()),
      output_name: raw.output_name.unwrap_or_default(),
      icon_file: raw.icon_file,
      project_libs: raw.project_libs.unwrap_or_default(),
      include_packages: raw.include_packages.unwrap_or_default().into_iter().collect(),
      build_libs,
      include_data_dirs: raw.include_data_dirs.unwrap_or_default(),
      nuitka_plugins: raw.nuitka_plugins.unwrap_or_default(),
      nuitka_extra_args: raw.nuitka_extra_args.unwrap_or_default(),
      windows_metadata: raw.windows_metadata,
      cleanup_items,
      output_dir: raw.output_dir,
      python: raw.python,
      base_dir: base_dir.to_path_buf(),
    })
  }

  /// Number of declared project dependencies.
  pub fn dependency_count(&self) -> usize {
    self.project_libs.len()
  }

  /// Number of packages force-bundled into the executable.
  pub fn package_count(&self) -> usize {
    self.include_packages.len()
  }

  /// Anchor a config-relative path at the project directory.
  pub fn resolve(&self, path: &Path) -> PathBuf {
    self.base_dir.join(path)
  }

  /// Directory the executable is written to.
  pub fn output_dir(&self) -> PathBuf {
    match &self.output_dir {
      Some(dir) => self.resolve(dir),
      None => self.base_dir.clone(),
    }
  }

  /// Path of the produced executable.
  pub fn artifact_path(&self) -> PathBuf {
    let suffix = std::env::consts::EXE_SUFFIX;
    let file_name = if suffix.is_empty() || self.output_name.ends_with(suffix) {
      self.output_name.clone()
    } else {
      format!("{}{}", self.output_name, suffix)
    };
    self.output_dir().join(file_name)
  }

  /// File stem of the entry script; the compiler names its scratch directories after it.
  pub fn main_stem(&self) -> String {
    self
      .main_file
      .file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_else(|| self.project_name.clone())
  }
}

/// True for paths strictly below the project directory: `.` alone names the project itself.
fn is_project_relative(path: &Path) -> bool {
  let mut components = path.components();
  components.clone().any(|c| matches!(c, Component::Normal(_)))
    && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
