//! Stage command integration tests.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

fn boot_args() -> [&'static str; 4] {
  ["boot", "service", "-b", "build"]
}

#[test]
#[serial]
fn boot_runs_every_stage_in_order() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(boot_args())
    .assert()
    .success()
    .stdout(predicate::str::contains("booted hello_world"))
    .stdout(predicate::str::contains("boot complete"));

  let source = env.source.display().to_string();
  let build = env.build_path().display().to_string();
  let calls = env.calls();
  assert_eq!(calls.len(), 4, "unexpected calls: {calls:?}");
  assert_eq!(calls[0], format!("conan install {source} -if {build}"));
  assert_eq!(calls[1], format!("cmake {source}"));
  assert!(calls[2].starts_with(&format!("cmake --build {build} -j ")));
  assert_eq!(calls[3], format!("boot {build}/hello_world"));
}

#[test]
#[serial]
fn boot_again_only_boots() {
  let env = TestEnv::new();
  env.includeos_cmd().args(boot_args()).assert().success();
  env.clear_calls();

  env.includeos_cmd().args(boot_args()).assert().success();

  let calls = env.calls();
  assert_eq!(calls.len(), 1);
  assert!(calls[0].starts_with("boot "));
}

#[test]
#[serial]
fn build_reinstall_reruns_installer() {
  let env = TestEnv::new();
  env.includeos_cmd().args(boot_args()).assert().success();
  env.clear_calls();

  env
    .includeos_cmd()
    .args(["build", "--reinstall", "service", "-b", "build"])
    .assert()
    .success();

  let calls = env.calls();
  assert_eq!(calls.len(), 3);
  assert!(calls[0].starts_with("conan install"));
  assert!(calls[1].starts_with("cmake "));
  assert!(calls[2].starts_with("cmake --build"));
}

#[test]
#[serial]
fn install_forwards_trailing_arguments() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(["install", "service", "-b", "build", "--", "-pr", "clang-6.0"])
    .assert()
    .success()
    .stderr(predicate::str::contains("conan install"));

  let calls = env.calls();
  assert_eq!(calls.len(), 1);
  assert!(calls[0].ends_with("-pr clang-6.0"), "unexpected call: {}", calls[0]);
  assert!(env.build_path().join("conanbuildinfo.cmake").exists());
}

#[test]
#[serial]
fn installer_options_are_not_taken_as_own_flags() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(["install", "service", "-b", "build", "-o", "hello:shared=True"])
    .assert()
    .success();

  let calls = env.calls();
  assert_eq!(calls.len(), 1);
  assert!(calls[0].ends_with(" -o hello:shared=True"), "unexpected call: {}", calls[0]);
}

#[test]
#[serial]
fn installer_remote_is_not_taken_as_reinstall() {
  let env = TestEnv::new();
  env.includeos_cmd().args(boot_args()).assert().success();
  env.clear_calls();

  env
    .includeos_cmd()
    .args(["build", "service", "-b", "build", "-r", "myremote"])
    .assert()
    .success();

  // Build scripts exist and no reinstall was asked for, so conan stays idle.
  let calls = env.calls();
  assert_eq!(calls.len(), 1, "unexpected calls: {calls:?}");
  assert!(calls[0].starts_with("cmake --build"));
}

#[test]
#[serial]
fn installer_remote_reaches_conan_verbatim() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(["build", "service", "-b", "build", "-r", "myremote"])
    .assert()
    .success();

  let calls = env.calls();
  assert!(calls[0].starts_with("conan install"));
  assert!(calls[0].ends_with(" -r myremote"), "unexpected call: {}", calls[0]);
}

#[test]
#[serial]
fn build_folder_alias_is_accepted() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(["install", "service", "--bf", "out"])
    .assert()
    .success();

  assert!(env.root().join("out").join("conanbuildinfo.cmake").exists());
}

#[test]
#[serial]
fn source_as_build_folder_uses_build_subdirectory() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .current_dir(&env.source)
    .args(["install", "."])
    .assert()
    .success()
    .stdout(predicate::str::contains(env.source.join("build").display().to_string()));

  assert!(env.source.join("build").join("conanbuildinfo.cmake").exists());
  assert!(!env.source.join("conanbuildinfo.cmake").exists());
}

#[test]
#[serial]
fn install_without_manifest_spawns_nothing() {
  let env = TestEnv::empty();

  env
    .includeos_cmd()
    .args(["install", "service", "-b", "build"])
    .assert()
    .failure()
    .code(3);

  assert!(env.calls().is_empty());
}

#[test]
#[serial]
fn failing_installer_exit_code() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(["configure", "service", "-b", "build"])
    .env("FAKE_CONAN_FAIL", "7")
    .assert()
    .failure()
    .code(5)
    .stderr(predicate::str::contains("dependency installer failed"));

  assert_eq!(env.calls().len(), 1);
}

#[test]
#[serial]
fn failing_build_stops_before_boot() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(boot_args())
    .env("FAKE_BUILD_FAIL", "2")
    .assert()
    .failure()
    .code(5)
    .stderr(predicate::str::contains("native build failed"));

  assert!(env.calls().iter().all(|c| !c.starts_with("boot ")));
}

#[test]
#[serial]
fn boot_without_produced_executable_fails() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(boot_args())
    .env("FAKE_BUILD_NOTHING", "1")
    .assert()
    .failure()
    .code(6)
    .stderr(predicate::str::contains("executable not found"));

  let builds = env.calls().iter().filter(|c| c.starts_with("cmake --build")).count();
  assert_eq!(builds, 1);
}

#[test]
#[serial]
fn missing_tool_is_reported() {
  let env = TestEnv::new();

  env
    .includeos_cmd()
    .args(["install", "service", "-b", "build"])
    .env("INCLUDEOS_CONAN", env.root().join("bin").join("missing-conan"))
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("failed to run"));
}

#[test]
#[serial]
fn json_output_reports_stage_result() {
  let env = TestEnv::new();

  let output = env
    .includeos_cmd()
    .args(["--output", "json", "install", "service", "-b", "build"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["stage"], "install");
  assert_eq!(report["succeeded"], true);
  assert!(report["failure_reason"].is_null());
  assert_eq!(report["build_dir"], env.build_path().display().to_string());
}

#[test]
#[serial]
fn json_output_reports_failure() {
  let env = TestEnv::empty();

  let output = env
    .includeos_cmd()
    .args(["-o", "json", "install", "service", "-b", "build"])
    .output()
    .unwrap();

  assert_eq!(output.status.code(), Some(3));
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["succeeded"], false);
  assert!(report["failure_reason"].as_str().unwrap().contains("conanfile.txt"));
}
