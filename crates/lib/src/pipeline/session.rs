//! Ephemeral per-invocation build state.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use super::types::{CleanupWarning, Stage};
use crate::consts::WORK_DIR_PREFIX;
use crate::toolchain::Environment;

/// State owned by the pipeline for a single build.
///
/// The working directory is exclusively owned by the session: each session
/// allocates a fresh one and nothing else is handed its path for writing except
/// the toolchain. It is removed by [`BuildSession::release_work_dir`], or when the
/// session is dropped.
#[derive(Debug)]
pub struct BuildSession {
  work_dir: Option<TempDir>,
  environment: Option<Environment>,
  stage: Stage,
}

impl BuildSession {
  pub fn new() -> Self {
    Self {
      work_dir: None,
      environment: None,
      stage: Stage::Created,
    }
  }

  pub fn stage(&self) -> Stage {
    self.stage
  }

  pub(crate) fn set_stage(&mut self, stage: Stage) {
    debug!(from = %self.stage, to = %stage, "session stage changed");
    self.stage = stage;
  }

  /// The working directory, while it exists.
  pub fn work_dir(&self) -> Option<&Path> {
    self.work_dir.as_ref().map(TempDir::path)
  }

  pub fn environment(&self) -> Option<&Environment> {
    self.environment.as_ref()
  }

  pub(crate) fn set_environment(&mut self, environment: Environment) {
    self.environment = Some(environment);
  }

  /// Create a fresh working directory under the system temp dir.
  pub(crate) fn allocate_work_dir(&mut self) -> io::Result<PathBuf> {
    let dir = tempfile::Builder::new().prefix(WORK_DIR_PREFIX).tempdir()?;
    let path = dir.path().to_path_buf();
    debug!(work_dir = %path.display(), "allocated working directory");
    self.work_dir = Some(dir);
    Ok(path)
  }

  /// Remove the working directory, if one was allocated.
  pub(crate) fn release_work_dir(&mut self) -> Result<(), CleanupWarning> {
    self.environment = None;
    let Some(dir) = self.work_dir.take() else {
      return Ok(());
    };

    let path = dir.path().to_path_buf();
    dir.close().map_err(|e| CleanupWarning {
      path: path.clone(),
      message: e.to_string(),
    })?;
    debug!(work_dir = %path.display(), "removed working directory");
    Ok(())
  }
}

impl Default for BuildSession {
  fn default() -> Self {
    Self::new()
  }
}
