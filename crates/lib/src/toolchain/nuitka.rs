//! Nuitka command-line construction.

use std::ffi::OsString;
use std::path::Path;

use tracing::warn;

use crate::config::ProjectConfig;

/// Flags passed to every compilation.
const BASE_FLAGS: &[&str] = &[
  "--standalone",
  "--onefile",
  "--assume-yes-for-downloads",
  "--remove-output",
  "--no-pyi-file",
];

/// Arguments for `python -m nuitka`, in order, ending with the entry script.
///
/// Data directories whose source does not exist and a missing icon are skipped
/// with a warning rather than handed to the compiler.
pub fn compile_args(config: &ProjectConfig) -> Vec<OsString> {
  let mut args: Vec<OsString> = vec!["-m".into(), "nuitka".into()];
  args.extend(BASE_FLAGS.iter().map(OsString::from));

  args.push(format!("--output-filename={}", config.output_name).into());
  args.push(flag_with_path("--output-dir=", &config.output_dir()));

  if let Some(meta) = &config.windows_metadata {
    for (flag, value) in meta.entries() {
      args.push(format!("--{}={}", flag, value).into());
    }
  }

  args.extend(config.nuitka_extra_args.iter().map(OsString::from));

  for package in &config.include_packages {
    args.push(format!("--include-package={}", package).into());
  }

  for data_dir in &config.include_data_dirs {
    let source = data_dir.split('=').next().unwrap_or(data_dir);
    if config.resolve(Path::new(source)).exists() {
      args.push(format!("--include-data-dir={}", data_dir).into());
    } else {
      warn!(data_dir = %data_dir, "data directory not found, skipping");
    }
  }

  for plugin in &config.nuitka_plugins {
    args.push(format!("--plugin-enable={}", plugin).into());
  }

  if let Some(icon) = &config.icon_file {
    let icon = config.resolve(icon);
    if icon.exists() {
      args.push(flag_with_path("--windows-icon-from-ico=", &icon));
    } else {
      warn!(icon = %icon.display(), "icon file not found, skipping");
    }
  }

  args.push(config.main_file.clone().into_os_string());
  args
}

fn flag_with_path(flag: &str, path: &Path) -> OsString {
  let mut arg = OsString::from(flag);
  arg.push(path.as_os_str());
  arg
}
