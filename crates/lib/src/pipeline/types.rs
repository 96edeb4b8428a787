//! Types for the build pipeline: session stages, steps, errors and results.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::toolchain::process::display_status;

/// Where a build session is in its lifecycle.
///
/// ```text
/// Created -> EnvironmentReady -> DependenciesInstalled -> Compiled -> CleanedUp
/// (any step failure) -> Failed, after cleanup
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
  Created,
  EnvironmentReady,
  DependenciesInstalled,
  Compiled,
  CleanedUp,
  Failed,
}

impl Stage {
  /// Whether the session has finished, successfully or not.
  pub fn is_terminal(self) -> bool {
    matches!(self, Stage::CleanedUp | Stage::Failed)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Stage::Created => "created",
      Stage::EnvironmentReady => "environment ready",
      Stage::DependenciesInstalled => "dependencies installed",
      Stage::Compiled => "compiled",
      Stage::CleanedUp => "cleaned up",
      Stage::Failed => "failed",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One of the four ordered pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
  CreateEnvironment,
  InstallDependencies,
  Compile,
  Cleanup,
}

impl Step {
  pub const ALL: [Step; 4] = [
    Step::CreateEnvironment,
    Step::InstallDependencies,
    Step::Compile,
    Step::Cleanup,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Step::CreateEnvironment => "create environment",
      Step::InstallDependencies => "install dependencies",
      Step::Compile => "compile",
      Step::Cleanup => "cleanup",
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The working directory or the isolated environment could not be set up.
  #[error("environment setup failed: {0}")]
  Environment(String),

  /// Installing a dependency failed; later dependencies were not attempted.
  #[error("failed to install {dependency} (exit status {}): {output}", display_status(.status))]
  DependencyInstall {
    dependency: String,
    status: Option<i32>,
    output: String,
  },

  /// The compiler failed or did not produce the executable.
  #[error("compilation failed (exit status {}): {output}", display_status(.status))]
  Compilation { status: Option<i32>, output: String },

  /// The build was interrupted; `stage` is the last stage the session reached.
  #[error("build interrupted (last stage reached: {stage})")]
  Interrupted { stage: Stage },

  /// A step was invoked out of order.
  #[error("cannot {step} while the session is {stage}")]
  OutOfOrder { step: Step, stage: Stage },
}

/// A non-fatal problem while releasing build resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupWarning {
  pub path: PathBuf,
  pub message: String,
}

impl fmt::Display for CleanupWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "failed to remove {}: {}", self.path.display(), self.message)
  }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
  /// Path of the produced executable, outside the working directory.
  pub artifact: PathBuf,
  pub elapsed: Duration,
  /// Cleanup problems that did not fail the build.
  pub warnings: Vec<CleanupWarning>,
}
