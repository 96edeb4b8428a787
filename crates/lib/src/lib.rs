//! pynexe-lib: turn a Python project into a standalone executable.
//!
//! This crate provides the pieces the `pynexe` CLI is built from:
//! - `config`: loading and validating the project's `config.yaml`
//! - `pipeline`: the four-step build controller and its progress events
//! - `toolchain`: the external tools (venv, pip, Nuitka) behind a trait
//! - `platform`: interpreter discovery and environment layout

pub mod config;
pub mod consts;
pub mod pipeline;
pub mod platform;
pub mod toolchain;
pub mod util;
