//! Platform-specific lookups: where interpreters live and how environments are laid out.

pub mod paths;

pub use paths::{find_interpreter, find_on_path, venv_python};
