//! Implementation of the default build command.

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use pynexe_lib::config::ProjectConfig;
use pynexe_lib::pipeline::{BuildError, Pipeline};
use pynexe_lib::toolchain::PythonToolchain;

use crate::output::{print_banner, print_info, print_stat, print_success, symbols};
use crate::reporter::ConsoleReporter;

use super::load_config;

/// Execute the build command.
///
/// Loads the config, then runs the pipeline until it finishes or the process
/// receives an interrupt. Cleanup runs in both cases.
pub fn cmd_build(config_path: &Path, verbose: bool) -> Result<()> {
  print_banner();

  let config = load_config(config_path)?;
  print_build_info(&config);

  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to start async runtime")?;

  let toolchain = PythonToolchain::new();
  let reporter = ConsoleReporter::new(verbose);
  let mut pipeline = Pipeline::new(&config, &toolchain, &reporter);

  let result = runtime.block_on(async {
    let outcome = tokio::select! {
      result = pipeline.run() => Some(result),
      _ = interrupted() => None,
    };
    match outcome {
      Some(result) => result,
      None => Err(pipeline.interrupt()),
    }
  });

  match result {
    Ok(report) => {
      println!();
      print_success("Build completed successfully!");
      print_stat("Output", &report.artifact.display().to_string());
      Ok(())
    }
    Err(err @ BuildError::Interrupted { .. }) => Err(anyhow::Error::new(err).context("Build interrupted")),
    Err(err) => Err(anyhow::Error::new(err).context("Build failed")),
  }
}

fn print_build_info(config: &ProjectConfig) {
  print_info(&format!("Project: {}", config.project_name));
  print_info(&format!(
    "{} {} {}",
    config.main_file.display(),
    symbols::ARROW,
    config.output_name
  ));
  println!();
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
fn interrupted() -> impl Future<Output = ()> {
  async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      warn!(error = %e, "failed to listen for interrupt");
      std::future::pending::<()>().await;
    }
  }
}
