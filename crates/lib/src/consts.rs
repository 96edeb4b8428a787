pub const APP_NAME: &str = "pynexe";

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Environment variable that overrides the interpreter used to create the build environment.
pub const PYTHON_ENV_VAR: &str = "PYNEXE_PYTHON";

/// Prefix of the isolated working directory created for each build session.
pub const WORK_DIR_PREFIX: &str = "pynexe-build-";

/// Tooling installed into every build environment unless `build_libs` overrides it.
pub const DEFAULT_BUILD_LIBS: &[&str] = &["nuitka", "ordered-set"];
