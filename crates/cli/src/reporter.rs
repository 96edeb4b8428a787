//! Console rendering of build progress.

use std::sync::Mutex;

use owo_colors::{OwoColorize, Stream};

use pynexe_lib::pipeline::{ProgressEvent, ProgressHandler, Step};

use crate::output::{format_duration, print_error, print_info, print_success, print_warning};

/// Prints pipeline progress as one line per step transition.
pub struct ConsoleReporter {
  verbose: bool,
  /// Step that started but has not completed.
  current: Mutex<Option<Step>>,
}

impl ConsoleReporter {
  pub fn new(verbose: bool) -> Self {
    Self {
      verbose,
      current: Mutex::new(None),
    }
  }

  fn swap_current(&self, step: Option<Step>) -> Option<Step> {
    let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
    std::mem::replace(&mut *current, step)
  }
}

pub fn started_label(step: Step) -> &'static str {
  match step {
    Step::CreateEnvironment => "Creating environment...",
    Step::InstallDependencies => "Installing dependencies...",
    Step::Compile => "Compiling with Nuitka...",
    Step::Cleanup => "Cleaning up...",
  }
}

pub fn step_name(step: Step) -> &'static str {
  match step {
    Step::CreateEnvironment => "Environment setup",
    Step::InstallDependencies => "Dependency installation",
    Step::Compile => "Compilation",
    Step::Cleanup => "Cleanup",
  }
}

pub fn completed_label(step: Step) -> &'static str {
  match step {
    Step::CreateEnvironment => "Environment created",
    Step::InstallDependencies => "Dependencies installed",
    Step::Compile => "Compilation completed",
    Step::Cleanup => "Cleanup finished",
  }
}

impl ProgressHandler for ConsoleReporter {
  fn on_progress(&self, event: &ProgressEvent) {
    match event {
      ProgressEvent::StepStarted(step) => {
        // Cleanup starting while another step is open means that step did not finish.
        if let Some(unfinished) = self.swap_current(Some(*step)) {
          print_error(&format!("{} did not finish", step_name(unfinished)));
        }
        print_info(started_label(*step));
      }
      ProgressEvent::StepCompleted { step, elapsed } => {
        self.swap_current(None);
        let timing = format!("({})", format_duration(*elapsed));
        print_success(&format!(
          "{} {}",
          completed_label(*step),
          timing.if_supports_color(Stream::Stdout, |s| s.dimmed())
        ));
      }
      ProgressEvent::DependencyStarted {
        index,
        total,
        dependency,
      } => {
        if self.verbose {
          println!("  [{}/{}] {}", index, total, dependency);
        }
      }
      ProgressEvent::CleanupWarning(warning) => print_warning(&warning.to_string()),
      ProgressEvent::Started { .. } | ProgressEvent::Completed { .. } | ProgressEvent::Failed { .. } => {}
    }
  }
}
