//! The seam between the build pipeline and the external tools it drives.
//!
//! The pipeline never spawns processes itself; it asks a [`Toolchain`] to
//! provision an environment, install one dependency at a time, and compile.
//! [`PythonToolchain`] is the real implementation (venv + pip + Nuitka).

pub mod nuitka;
pub mod process;
pub mod python;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::{DependencySpec, ProjectConfig};

pub use process::{ToolError, run_tool};
pub use python::PythonToolchain;

/// A provisioned, isolated environment inside a session's working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
  /// Root of the environment (e.g. the venv directory).
  pub root: PathBuf,
  /// Interpreter that runs the installer and compiler inside the environment.
  pub python: PathBuf,
}

/// External tools used by the build pipeline.
///
/// Implementations block (asynchronously) until the external process exits and
/// must not retry on their own.
#[async_trait]
pub trait Toolchain: Send + Sync {
  /// Provision an environment inside `work_dir` and install `build_libs` into it.
  async fn create_env(&self, work_dir: &Path, config: &ProjectConfig) -> Result<Environment, ToolError>;

  /// Install a single dependency into `env`.
  async fn install(&self, env: &Environment, dependency: &DependencySpec, cwd: &Path) -> Result<(), ToolError>;

  /// Compile the project's entry script; the artifact lands at `config.artifact_path()`.
  async fn compile(&self, env: &Environment, config: &ProjectConfig) -> Result<(), ToolError>;
}
