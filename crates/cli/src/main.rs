mod cmd;
mod output;
mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmd::{cmd_build, cmd_help, cmd_info};
use output::print_error;
use pynexe_lib::consts::DEFAULT_CONFIG_FILE;

/// Build Python applications into native executables with Nuitka.
#[derive(Parser)]
#[command(name = "pynexe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the project config file
  #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Show project information without building
  #[arg(long)]
  info: bool,

  /// Print project information as JSON
  #[arg(long, requires = "info")]
  json: bool,

  /// Show usage and examples
  #[arg(long)]
  show_help: bool,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if cli.show_help {
    cmd_help();
    return ExitCode::SUCCESS;
  }

  let result = if cli.info {
    cmd_info(&cli.config, cli.json)
  } else {
    cmd_build(&cli.config, cli.verbose)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("pynexe_lib=debug,pynexe=debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
