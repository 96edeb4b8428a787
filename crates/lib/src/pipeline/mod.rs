//! The build pipeline controller.
//!
//! A [`Pipeline`] drives one [`ProjectConfig`] through four ordered steps:
//! - create an isolated environment in a fresh working directory
//! - install the project's dependencies, one at a time and in declared order
//! - compile the entry script into an executable outside the working directory
//! - clean up the working directory and the compiler's scratch output
//!
//! The first failing step aborts the ones after it, but cleanup always runs,
//! exactly once. Progress is reported to a [`ProgressHandler`].

pub mod progress;
pub mod session;
pub mod types;

use std::path::PathBuf;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::ProjectConfig;
use crate::toolchain::{Environment, ToolError, Toolchain};

pub use progress::{NoOpHandler, ProgressEvent, ProgressHandler};
pub use session::BuildSession;
pub use types::{BuildError, BuildReport, CleanupWarning, Stage, Step};

/// Drives a single build session.
///
/// If the future returned by [`Pipeline::run`] is dropped part-way (e.g. on
/// interrupt), any running tool is killed; call [`Pipeline::interrupt`]
/// afterwards to clean up and obtain the error. Dropping the pipeline itself also
/// removes the working directory.
pub struct Pipeline<'a> {
  config: &'a ProjectConfig,
  toolchain: &'a dyn Toolchain,
  handler: &'a dyn ProgressHandler,
  session: BuildSession,
  cleaned_up: bool,
}

impl<'a> Pipeline<'a> {
  pub fn new(config: &'a ProjectConfig, toolchain: &'a dyn Toolchain, handler: &'a dyn ProgressHandler) -> Self {
    Self {
      config,
      toolchain,
      handler,
      session: BuildSession::new(),
      cleaned_up: false,
    }
  }

  pub fn stage(&self) -> Stage {
    self.session.stage()
  }

  pub fn session(&self) -> &BuildSession {
    &self.session
  }

  /// Run every step in order.
  ///
  /// On failure the remaining steps are skipped, cleanup still runs, and the
  /// original error is returned; cleanup problems never replace it.
  pub async fn run(&mut self) -> Result<BuildReport, BuildError> {
    let start = Instant::now();
    info!(
      project = %self.config.project_name,
      main_file = %self.config.main_file.display(),
      output = %self.config.output_name,
      "starting build"
    );
    self.handler.on_progress(&ProgressEvent::Started {
      project: self.config.project_name.clone(),
      main_file: self.config.main_file.clone(),
      output_name: self.config.output_name.clone(),
    });

    let result = self.execute().await;
    let warnings = self.cleanup();

    match result {
      Ok(artifact) => {
        let elapsed = start.elapsed();
        info!(artifact = %artifact.display(), elapsed_ms = elapsed.as_millis() as u64, "build complete");
        self.handler.on_progress(&ProgressEvent::Completed {
          artifact: artifact.clone(),
          elapsed,
        });
        Ok(BuildReport {
          artifact,
          elapsed,
          warnings,
        })
      }
      Err(err) => {
        self.fail(&err);
        Err(err)
      }
    }
  }

  async fn execute(&mut self) -> Result<PathBuf, BuildError> {
    self.create_env().await?;
    self.install_dependencies().await?;
    self.compile().await
  }

  /// Step 1: allocate the working directory and provision the environment in it.
  pub async fn create_env(&mut self) -> Result<(), BuildError> {
    self.expect_stage(Step::CreateEnvironment, Stage::Created)?;
    let started = self.begin(Step::CreateEnvironment);

    let work_dir = self
      .session
      .allocate_work_dir()
      .map_err(|e| BuildError::Environment(format!("failed to create working directory: {e}")))?;

    let environment = self
      .toolchain
      .create_env(&work_dir, self.config)
      .await
      .map_err(|e| BuildError::Environment(describe(&e)))?;

    info!(env = %environment.root.display(), python = %environment.python.display(), "environment ready");
    self.session.set_environment(environment);
    self.session.set_stage(Stage::EnvironmentReady);
    self.finish(Step::CreateEnvironment, started);
    Ok(())
  }

  /// Step 2: install `project_libs` in declared order, stopping at the first failure.
  pub async fn install_dependencies(&mut self) -> Result<(), BuildError> {
    let environment = self.environment_for(Step::InstallDependencies, Stage::EnvironmentReady)?;
    let started = self.begin(Step::InstallDependencies);

    let total = self.config.project_libs.len();
    for (index, dependency) in self.config.project_libs.iter().enumerate() {
      let spec = dependency.to_string();
      info!(dependency = %spec, index = index + 1, total, "installing dependency");
      self.handler.on_progress(&ProgressEvent::DependencyStarted {
        index: index + 1,
        total,
        dependency: spec.clone(),
      });

      self
        .toolchain
        .install(&environment, dependency, &self.config.base_dir)
        .await
        .map_err(|e| BuildError::DependencyInstall {
          dependency: spec,
          status: e.status(),
          output: e.output(),
        })?;
    }

    self.session.set_stage(Stage::DependenciesInstalled);
    self.finish(Step::InstallDependencies, started);
    Ok(())
  }

  /// Step 3: compile the entry script, returning the path of the executable.
  ///
  /// The entry script is not checked beforehand; a missing file surfaces as the
  /// compiler's own error.
  pub async fn compile(&mut self) -> Result<PathBuf, BuildError> {
    let environment = self.environment_for(Step::Compile, Stage::DependenciesInstalled)?;
    let started = self.begin(Step::Compile);

    self
      .toolchain
      .compile(&environment, self.config)
      .await
      .map_err(|e| BuildError::Compilation {
        status: e.status(),
        output: e.output(),
      })?;

    let artifact = self.config.artifact_path();
    if !artifact.exists() {
      return Err(BuildError::Compilation {
        status: Some(0),
        output: format!("compiler reported success but {} was not created", artifact.display()),
      });
    }

    self.session.set_stage(Stage::Compiled);
    self.finish(Step::Compile, started);
    Ok(artifact)
  }

  /// Step 4: remove the working directory and the compiler's scratch output.
  ///
  /// Runs at most once per session; later calls return no warnings. The produced
  /// executable is never removed.
  pub fn cleanup(&mut self) -> Vec<CleanupWarning> {
    if self.cleaned_up {
      return Vec::new();
    }
    self.cleaned_up = true;
    let started = self.begin(Step::Cleanup);

    let (targets, mut warnings) = self.cleanup_targets();
    for path in targets {
      if let Err(e) = remove_path(&path) {
        warnings.push(CleanupWarning {
          path,
          message: e.to_string(),
        });
      }
    }
    if let Err(warning) = self.session.release_work_dir() {
      warnings.push(warning);
    }

    for warning in &warnings {
      warn!(path = %warning.path.display(), error = %warning.message, "cleanup failed");
      self.handler.on_progress(&ProgressEvent::CleanupWarning(warning.clone()));
    }

    if self.session.stage() == Stage::Compiled {
      self.session.set_stage(Stage::CleanedUp);
    }
    self.finish(Step::Cleanup, started);
    warnings
  }

  /// Clean up after the in-flight [`Pipeline::run`] future was dropped.
  ///
  /// Returns [`BuildError::Interrupted`] naming the last stage reached.
  pub fn interrupt(&mut self) -> BuildError {
    let stage = self.session.stage();
    warn!(stage = %stage, "build interrupted");
    self.cleanup();
    let err = BuildError::Interrupted { stage };
    self.fail(&err);
    err
  }

  /// Paths removed during cleanup.
  ///
  /// Targets that contain the artifact, or lie inside it, are skipped and
  /// reported as warnings so the executable survives.
  fn cleanup_targets(&self) -> (Vec<PathBuf>, Vec<CleanupWarning>) {
    let output_dir = self.config.output_dir();
    let stem = self.config.main_stem();
    let artifact = self.config.artifact_path();

    let mut candidates: Vec<PathBuf> = ["build", "dist", "onefile-build"]
      .iter()
      .map(|suffix| output_dir.join(format!("{stem}.{suffix}")))
      .collect();
    candidates.push(self.config.base_dir.join("__pycache__"));
    candidates.extend(self.config.cleanup_items.iter().map(|item| self.config.resolve(item)));

    let (skipped, targets): (Vec<PathBuf>, Vec<PathBuf>) = candidates
      .into_iter()
      .partition(|path| artifact.starts_with(path) || path.starts_with(&artifact));

    let warnings = skipped
      .into_iter()
      .map(|path| CleanupWarning {
        message: format!("skipped, it would remove the executable {}", artifact.display()),
        path,
      })
      .collect();

    (targets, warnings)
  }

  fn fail(&mut self, err: &BuildError) {
    error!(error = %err, stage = %self.session.stage(), "build failed");
    self.session.set_stage(Stage::Failed);
    self.handler.on_progress(&ProgressEvent::Failed { error: err.to_string() });
  }

  fn expect_stage(&self, step: Step, expected: Stage) -> Result<(), BuildError> {
    let stage = self.session.stage();
    if stage != expected || self.cleaned_up {
      return Err(BuildError::OutOfOrder { step, stage });
    }
    Ok(())
  }

  fn environment_for(&self, step: Step, expected: Stage) -> Result<Environment, BuildError> {
    self.expect_stage(step, expected)?;
    self.session.environment().cloned().ok_or(BuildError::OutOfOrder {
      step,
      stage: self.session.stage(),
    })
  }

  fn begin(&self, step: Step) -> Instant {
    self.handler.on_progress(&ProgressEvent::StepStarted(step));
    Instant::now()
  }

  fn finish(&self, step: Step, started: Instant) {
    self.handler.on_progress(&ProgressEvent::StepCompleted {
      step,
      elapsed: started.elapsed(),
    });
  }
}

/// A tool error with its diagnostic output appended.
fn describe(err: &ToolError) -> String {
  let output = err.output();
  match err {
    ToolError::Failed { .. } if !output.is_empty() => format!("{err}: {output}"),
    _ => err.to_string(),
  }
}

fn remove_path(path: &std::path::Path) -> std::io::Result<()> {
  match std::fs::symlink_metadata(path) {
    Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
    Ok(_) => std::fs::remove_file(path),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e),
  }
}
