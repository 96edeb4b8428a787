use std::env;
use std::path::{Path, PathBuf};

use crate::consts::PYTHON_ENV_VAR;

/// Interpreter names tried, in order, when nothing is configured.
#[cfg(windows)]
const INTERPRETER_CANDIDATES: &[&str] = &["python", "py"];

/// Interpreter names tried, in order, when nothing is configured.
#[cfg(not(windows))]
const INTERPRETER_CANDIDATES: &[&str] = &["python3", "python"];

/// Returns the interpreter inside a virtual environment
#[cfg(windows)]
pub fn venv_python(venv: &Path) -> PathBuf {
  venv.join("Scripts").join("python.exe")
}

/// Returns the interpreter inside a virtual environment
#[cfg(not(windows))]
pub fn venv_python(venv: &Path) -> PathBuf {
  venv.join("bin").join("python")
}

/// Search `PATH` for an executable named `name`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
  let path = env::var_os("PATH")?;
  let file_name = format!("{}{}", name, env::consts::EXE_SUFFIX);
  env::split_paths(&path)
    .map(|dir| dir.join(&file_name))
    .find(|candidate| candidate.is_file())
}

/// Locate the interpreter used to create build environments.
///
/// Precedence: the `PYNEXE_PYTHON` environment variable, then `configured`, then
/// the first of `python3`/`python` found on `PATH`. Names without a directory
/// component are looked up on `PATH`; explicit paths must point at a file.
pub fn find_interpreter(configured: Option<&Path>) -> Option<PathBuf> {
  let explicit = env::var_os(PYTHON_ENV_VAR)
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
    .or_else(|| configured.map(Path::to_path_buf));

  if let Some(explicit) = explicit {
    return resolve_explicit(&explicit);
  }

  INTERPRETER_CANDIDATES.iter().find_map(|name| find_on_path(name))
}

fn resolve_explicit(path: &Path) -> Option<PathBuf> {
  if path.components().count() > 1 {
    return path.is_file().then(|| path.to_path_buf());
  }
  find_on_path(&path.to_string_lossy())
}
