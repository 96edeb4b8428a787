use owo_colors::{OwoColorize, Stream};

use crate::output::print_banner;

const USAGE: &[(&str, &str)] = &[
  ("pynexe", "Build project"),
  ("pynexe --info", "Show project info"),
  ("pynexe --info --json", "Show project info as JSON"),
  ("pynexe --config my.yaml", "Build using another config file"),
  ("pynexe --verbose", "Show per-dependency progress and debug logs"),
  ("pynexe --show-help", "Show this help"),
];

/// Print usage and examples. Has no side effects beyond writing to stdout.
pub fn cmd_help() {
  print_banner();

  println!("{}", "Usage:".if_supports_color(Stream::Stdout, |s| s.bold()));
  for (command, description) in USAGE {
    println!(
      "  {:<28} {}",
      command,
      format!("# {}", description).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }

  println!();
  println!("{}", "Examples:".if_supports_color(Stream::Stdout, |s| s.bold()));
  println!("  pynexe");
  println!("  pynexe --info");
  println!("  pynexe --config my_config.yaml");
}
