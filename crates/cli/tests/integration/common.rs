//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated project directory with its own stand-in interpreter.
///
/// The interpreter lives outside the project so that it never shows up in
/// cleanup assertions. Every tool invocation is appended to a call log.
pub struct TestEnv {
  pub project: TempDir,
  pub tools: TempDir,
  pub config_path: PathBuf,
  pub python: PathBuf,
  pub log: PathBuf,
}

impl TestEnv {
  /// Create a project whose `config.yaml` holds `config`.
  pub fn with_config(config: &str) -> Self {
    use std::os::unix::fs::PermissionsExt;

    let project = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let config_path = project.path().join("config.yaml");
    std::fs::write(&config_path, config).unwrap();

    let log = tools.path().join("calls.log");
    let python = tools.path().join("python3");
    let script = fixture_content("fake_python.sh").replace("@LOG@", &log.to_string_lossy());
    std::fs::write(&python, script).unwrap();
    std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

    Self {
      project,
      tools,
      config_path,
      python,
      log,
    }
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.project.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.project.path().join(relative_path)
  }

  /// A `pynexe` command run from the project directory with the stand-in interpreter.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("pynexe");
    cmd
      .current_dir(self.project.path())
      .env("PYNEXE_PYTHON", &self.python)
      .env_remove("RUST_LOG");
    cmd
  }

  /// Tool invocations in order, e.g. `pip install --disable-pip-version-check rich`.
  pub fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(&self.log)
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// Specifiers passed to `pip install`, in order.
  pub fn installs(&self) -> Vec<String> {
    self
      .calls()
      .iter()
      .filter(|c| c.starts_with("pip install"))
      .filter_map(|c| c.rsplit(' ').next().map(str::to_string))
      .collect()
  }

  /// Virtual environment directory the build created, from the `venv` call.
  pub fn venv_dir(&self) -> Option<PathBuf> {
    self
      .calls()
      .iter()
      .find_map(|c| c.strip_prefix("venv ").map(|dir| PathBuf::from(dir.trim())))
  }
}

/// Whether `path` exists, without following symlinks.
pub fn exists(path: &Path) -> bool {
  path.symlink_metadata().is_ok()
}
