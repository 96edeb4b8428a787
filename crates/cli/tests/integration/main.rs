//! Integration tests that run full builds against a stand-in Python toolchain.

#[cfg(unix)]
mod build_tests;
#[cfg(unix)]
mod common;
