//! Test utilities for pynexe-lib.
//!
//! Provides a recording [`Toolchain`] and [`ProgressHandler`] for pipeline tests,
//! and a shell script that stands in for a Python interpreter on Unix.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::{DependencySpec, ProjectConfig};
use crate::pipeline::{ProgressEvent, ProgressHandler};
use crate::toolchain::{Environment, ToolError, Toolchain};

/// A call received by [`RecordingToolchain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
  CreateEnv { work_dir: PathBuf },
  Install { dependency: String },
  Compile { main_file: PathBuf, output_name: String },
}

/// Toolchain that records calls instead of running tools.
///
/// `compile` writes a placeholder executable at the configured artifact path
/// unless `skip_artifact` is set.
#[derive(Debug, Default)]
pub struct RecordingToolchain {
  pub calls: Mutex<Vec<ToolCall>>,
  pub fail_env: bool,
  /// Name of the dependency whose install fails.
  pub fail_install: Option<String>,
  pub fail_compile: bool,
  pub skip_artifact: bool,
  /// Never finish compiling; used to exercise interruption.
  pub hang_compile: bool,
}

impl RecordingToolchain {
  pub fn calls(&self) -> Vec<ToolCall> {
    self.calls.lock().unwrap().clone()
  }

  pub fn installs(&self) -> Vec<String> {
    self
      .calls()
      .into_iter()
      .filter_map(|c| match c {
        ToolCall::Install { dependency } => Some(dependency),
        _ => None,
      })
      .collect()
  }

  pub fn compile_count(&self) -> usize {
    self
      .calls()
      .iter()
      .filter(|c| matches!(c, ToolCall::Compile { .. }))
      .count()
  }

  /// Working directory handed to `create_env`, if it was called.
  pub fn work_dir(&self) -> Option<PathBuf> {
    self.calls().into_iter().find_map(|c| match c {
      ToolCall::CreateEnv { work_dir } => Some(work_dir),
      _ => None,
    })
  }

  fn record(&self, call: ToolCall) {
    self.calls.lock().unwrap().push(call);
  }
}

fn failed(program: &str, output: &str) -> ToolError {
  ToolError::Failed {
    program: program.to_string(),
    status: Some(1),
    output: output.to_string(),
  }
}

#[async_trait]
impl Toolchain for RecordingToolchain {
  async fn create_env(&self, work_dir: &Path, _config: &ProjectConfig) -> Result<Environment, ToolError> {
    self.record(ToolCall::CreateEnv {
      work_dir: work_dir.to_path_buf(),
    });
    if self.fail_env {
      return Err(failed("python", "Error: ensurepip is not available"));
    }

    let root = work_dir.join("venv");
    std::fs::create_dir_all(root.join("bin")).map_err(|source| ToolError::Spawn {
      program: "python".to_string(),
      source,
    })?;
    Ok(Environment {
      python: root.join("bin").join("python"),
      root,
    })
  }

  async fn install(&self, _env: &Environment, dependency: &DependencySpec, _cwd: &Path) -> Result<(), ToolError> {
    self.record(ToolCall::Install {
      dependency: dependency.to_string(),
    });
    if self.fail_install.as_deref() == Some(dependency.name.as_str()) {
      return Err(failed("pip", "ERROR: No matching distribution found"));
    }
    Ok(())
  }

  async fn compile(&self, _env: &Environment, config: &ProjectConfig) -> Result<(), ToolError> {
    self.record(ToolCall::Compile {
      main_file: config.main_file.clone(),
      output_name: config.output_name.clone(),
    });
    if self.hang_compile {
      std::future::pending::<()>().await;
    }
    if self.fail_compile {
      return Err(failed("nuitka", "FATAL: Error, file 'app.py' is not found."));
    }
    if !self.skip_artifact {
      let artifact = config.artifact_path();
      if let Some(parent) = artifact.parent() {
        std::fs::create_dir_all(parent).unwrap();
      }
      std::fs::write(&artifact, b"binary").unwrap();
    }
    Ok(())
  }
}

/// Handler that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingHandler {
  pub events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingHandler {
  pub fn events(&self) -> Vec<ProgressEvent> {
    self.events.lock().unwrap().clone()
  }
}

impl ProgressHandler for RecordingHandler {
  fn on_progress(&self, event: &ProgressEvent) {
    self.events.lock().unwrap().push(event.clone());
  }
}

/// A config rooted at `base_dir` with the given extra YAML appended.
pub fn project_config(base_dir: &Path, extra: &str) -> ProjectConfig {
  let content = format!("project_name: demo\nmain_file: app.py\noutput_name: app\n{extra}");
  ProjectConfig::from_yaml_str(&content, base_dir).unwrap()
}

/// Shell script that behaves like a Python interpreter for `-m venv`, `-m pip`
/// and `-m nuitka`. Calls are appended to the log file substituted for `@LOG@`.
///
/// - `venv DIR` copies the script to `DIR/bin/python`
/// - `pip install SPEC` fails for specifiers starting with `broken`
/// - `nuitka ... MAIN` fails when `MAIN` is missing, otherwise writes the output file
#[cfg(unix)]
pub const FAKE_PYTHON: &str = include_str!("../../../cli/tests/fixtures/fake_python.sh");

/// Write [`FAKE_PYTHON`] into `dir`, returning `(interpreter, call log)`.
#[cfg(unix)]
pub fn fake_python(dir: &Path) -> (PathBuf, PathBuf) {
  use std::os::unix::fs::PermissionsExt;

  let log = dir.join("calls.log");
  let python = dir.join("python3");
  std::fs::write(&python, FAKE_PYTHON.replace("@LOG@", &log.to_string_lossy())).unwrap();
  std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();
  (python, log)
}
