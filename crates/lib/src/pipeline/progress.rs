//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

use super::types::{CleanupWarning, Step};

/// Events emitted while a build runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
  /// Build started
  Started {
    project: String,
    main_file: PathBuf,
    output_name: String,
  },

  /// A pipeline step started
  StepStarted(Step),

  /// A pipeline step finished successfully
  StepCompleted { step: Step, elapsed: Duration },

  /// A single dependency install is about to run (`index` is 1-based)
  DependencyStarted {
    index: usize,
    total: usize,
    dependency: String,
  },

  /// Something could not be removed during cleanup
  CleanupWarning(CleanupWarning),

  /// Build completed successfully
  Completed { artifact: PathBuf, elapsed: Duration },

  /// Build failed
  Failed { error: String },
}

/// Trait for observing build progress
pub trait ProgressHandler: Send + Sync {
  /// Called when a progress event occurs
  fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
  fn on_progress(&self, _event: &ProgressEvent) {}
}
