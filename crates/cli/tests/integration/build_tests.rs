//! End-to-end builds through the CLI.

use predicates::prelude::*;
use serial_test::serial;

use crate::common::{TestEnv, exists};

const APP: &str = "print('hello')\n";

const CONFIG: &str = r#"
project_name: Demo App
main_file: app.py
output_name: demo
project_libs:
  - requests>=2.31
  - rich
"#;

#[test]
#[serial]
fn build_produces_executable_and_cleans_up() {
  let env = TestEnv::with_config(CONFIG);
  env.write_file("app.py", APP);

  env
    .cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Environment created"))
    .stdout(predicate::str::contains("Dependencies installed"))
    .stdout(predicate::str::contains("Compilation completed"))
    .stdout(predicate::str::contains("Build completed successfully!"));

  assert!(env.path("demo").is_file());
  assert_eq!(env.installs(), ["nuitka", "ordered-set", "requests>=2.31", "rich"]);

  let venv = env.venv_dir().expect("venv was created");
  let work_dir = venv.parent().unwrap();
  assert!(!exists(work_dir), "working directory {} was left behind", work_dir.display());
}

#[test]
#[serial]
fn build_without_dependencies_only_installs_build_tooling() {
  let env = TestEnv::with_config("project_name: Demo App\nmain_file: app.py\noutput_name: demo\n");
  env.write_file("app.py", APP);

  env.cmd().assert().success();

  assert_eq!(env.installs(), ["nuitka", "ordered-set"]);
  assert!(env.path("demo").is_file());
}

#[test]
#[serial]
fn build_removes_compiler_scratch_but_keeps_sources() {
  let env = TestEnv::with_config(CONFIG);
  env.write_file("app.py", APP);
  env.write_file("app.build/module.c", "int x;\n");
  env.write_file("__pycache__/app.cpython-312.pyc", "");

  env.cmd().assert().success();

  assert!(!exists(&env.path("app.build")));
  assert!(!exists(&env.path("__pycache__")));
  assert!(env.path("app.py").is_file());
  assert!(env.path("config.yaml").is_file());
}

#[test]
#[serial]
fn build_with_config_outside_working_directory() {
  let env = TestEnv::with_config(CONFIG);
  env.write_file("app.py", APP);

  env
    .cmd()
    .current_dir(env.tools.path())
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .success();

  assert!(env.path("demo").is_file());
  assert!(!env.tools.path().join("demo").exists());
}

#[test]
#[serial]
fn build_into_output_dir() {
  let env = TestEnv::with_config(&format!("{CONFIG}output_dir: dist\n"));
  env.write_file("app.py", APP);

  env
    .cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("dist"));

  assert!(env.path("dist/demo").is_file());
}

#[test]
#[serial]
fn failing_dependency_stops_the_build() {
  let env = TestEnv::with_config(
    "project_name: Demo App\nmain_file: app.py\noutput_name: demo\nproject_libs: [rich, broken-lib, requests]\n",
  );
  env.write_file("app.py", APP);

  env
    .cmd()
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Build failed"))
    .stderr(predicate::str::contains("broken-lib"));

  assert_eq!(env.installs(), ["nuitka", "ordered-set", "rich", "broken-lib"]);
  assert!(!env.calls().iter().any(|c| c.starts_with("nuitka")));
  assert!(!exists(&env.path("demo")));

  let work_dir = env.venv_dir().unwrap().parent().unwrap().to_path_buf();
  assert!(!exists(&work_dir));
}

#[test]
#[serial]
fn missing_main_file_fails_compilation() {
  let env = TestEnv::with_config(CONFIG);

  env
    .cmd()
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("compilation failed"))
    .stderr(predicate::str::contains("app.py"));

  assert!(!exists(&env.path("demo")));
}

#[test]
#[serial]
fn verbose_lists_each_dependency() {
  let env = TestEnv::with_config(CONFIG);
  env.write_file("app.py", APP);

  env
    .cmd()
    .arg("--verbose")
    .assert()
    .success()
    .stdout(predicate::str::contains("[1/2] requests>=2.31"))
    .stdout(predicate::str::contains("[2/2] rich"));
}

#[test]
#[serial]
fn unusable_interpreter_fails_environment_setup() {
  let env = TestEnv::with_config(CONFIG);
  env.write_file("app.py", APP);

  env
    .cmd()
    .env("PYNEXE_PYTHON", env.tools.path().join("missing-python"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("environment setup failed"));

  assert!(env.calls().is_empty());
}
