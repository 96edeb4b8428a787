//! Python toolchain: `venv` for isolation, `pip` for dependencies, Nuitka for compilation.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::process::{ToolError, run_tool};
use super::{Environment, Toolchain, nuitka};
use crate::config::{DependencySpec, ProjectConfig};
use crate::platform::{find_interpreter, venv_python};

/// Name of the virtual environment directory inside the working directory.
const VENV_DIR: &str = "venv";

/// Drives a system Python interpreter and the tools installed into its venv.
#[derive(Debug, Clone, Default)]
pub struct PythonToolchain {
  interpreter: Option<PathBuf>,
}

impl PythonToolchain {
  /// Discover the interpreter when the environment is created (see
  /// [`find_interpreter`]).
  pub fn new() -> Self {
    Self::default()
  }

  /// Always use `interpreter`, bypassing discovery.
  pub fn with_interpreter(interpreter: impl Into<PathBuf>) -> Self {
    Self {
      interpreter: Some(interpreter.into()),
    }
  }

  fn interpreter(&self, config: &ProjectConfig) -> Result<PathBuf, ToolError> {
    if let Some(interpreter) = &self.interpreter {
      return Ok(interpreter.clone());
    }

    let configured = config.python.as_ref().map(|p| {
      if p.components().count() > 1 {
        config.resolve(p)
      } else {
        p.clone()
      }
    });

    find_interpreter(configured.as_deref()).ok_or_else(|| ToolError::Spawn {
      program: "python".to_string(),
      source: io::Error::new(
        io::ErrorKind::NotFound,
        "no Python interpreter found; set PYNEXE_PYTHON or `python` in the config",
      ),
    })
  }
}

#[async_trait]
impl Toolchain for PythonToolchain {
  async fn create_env(&self, work_dir: &Path, config: &ProjectConfig) -> Result<Environment, ToolError> {
    let interpreter = self.interpreter(config)?;
    let root = work_dir.join(VENV_DIR);

    info!(python = %interpreter.display(), venv = %root.display(), "creating virtual environment");
    run_tool(&interpreter, [OsStr::new("-m"), OsStr::new("venv"), root.as_os_str()], work_dir).await?;

    let environment = Environment {
      python: venv_python(&root),
      root,
    };

    for lib in &config.build_libs {
      debug!(lib = %lib, "installing build tooling");
      self.install(&environment, lib, work_dir).await?;
    }

    Ok(environment)
  }

  async fn install(&self, env: &Environment, dependency: &DependencySpec, cwd: &Path) -> Result<(), ToolError> {
    let spec = dependency.to_string();
    run_tool(
      &env.python,
      ["-m", "pip", "install", "--disable-pip-version-check", spec.as_str()],
      cwd,
    )
    .await?;
    Ok(())
  }

  async fn compile(&self, env: &Environment, config: &ProjectConfig) -> Result<(), ToolError> {
    let args = nuitka::compile_args(config);
    info!(main_file = %config.main_file.display(), output = %config.output_name, "compiling");
    run_tool(&env.python, &args, &config.base_dir).await?;
    Ok(())
  }
}
