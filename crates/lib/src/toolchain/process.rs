//! Subprocess execution for external tools.
//!
//! Every tool invocation goes through [`run_tool`]: the child is awaited to
//! completion, its output captured, and it is killed if the awaiting future is
//! dropped (which is how an interrupt reaches an in-flight tool).

use std::ffi::OsStr;
use std::path::Path;
use std::process::Output;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
  /// The tool could not be started at all.
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The tool ran and exited unsuccessfully.
  #[error("{program} exited with status {}", display_status(.status))]
  Failed {
    program: String,
    status: Option<i32>,
    /// Captured stderr, falling back to stdout when stderr is empty.
    output: String,
  },
}

impl ToolError {
  /// Exit status of the tool, if it ran and exited normally.
  pub fn status(&self) -> Option<i32> {
    match self {
      ToolError::Spawn { .. } => None,
      ToolError::Failed { status, .. } => *status,
    }
  }

  /// Diagnostic output of the failed tool, or the spawn error.
  pub fn output(&self) -> String {
    match self {
      ToolError::Spawn { source, .. } => source.to_string(),
      ToolError::Failed { output, .. } => output.clone(),
    }
  }
}

/// Render an exit status, which is absent when the process was killed by a signal.
pub(crate) fn display_status(status: &Option<i32>) -> String {
  match status {
    Some(code) => code.to_string(),
    None => "unknown (terminated by signal)".to_string(),
  }
}

/// Run `program` with `args` in `cwd`, returning its trimmed stdout on success.
///
/// # Errors
///
/// [`ToolError::Spawn`] if the process cannot be started, [`ToolError::Failed`]
/// if it exits with a non-zero status.
pub async fn run_tool<I, S>(program: &Path, args: I, cwd: &Path) -> Result<String, ToolError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
  let program_name = program.display().to_string();

  info!(program = %program_name, args = ?args, "running tool");
  debug!(cwd = %cwd.display(), "spawning process");

  let output = Command::new(program)
    .args(&args)
    .current_dir(cwd)
    .kill_on_drop(true)
    .output()
    .await
    .map_err(|source| ToolError::Spawn {
      program: program_name.clone(),
      source,
    })?;

  check_output(&program_name, output)
}

fn check_output(program: &str, output: Output) -> Result<String, ToolError> {
  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

  if !output.status.success() {
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "tool stderr");
    }
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "tool stdout");
    }

    return Err(ToolError::Failed {
      program: program.to_string(),
      status: output.status.code(),
      output: if stderr.is_empty() { stdout } else { stderr },
    });
  }

  if !stdout.is_empty() {
    debug!(stdout = %stdout, "tool output");
  }

  Ok(stdout)
}
