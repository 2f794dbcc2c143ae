use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"
[[configurations.runtimeClasspath.components]]
ref = "app"
state = "resolved"
module = "org:app:1.0"

[[configurations.runtimeClasspath.components]]
ref = "core"
state = "resolved"
module = "lib:core:2.0"

[[configurations.runtimeClasspath.dependencies]]
requested = "org:app:1.0"
target = "app"

[[configurations.runtimeClasspath.dependencies]]
from = "app"
requested = "lib:core:1.0"
target = "core"

[configurations.conflicted.failure]
kind = "version-conflict"
conflicts = [["lib:core:1.0", "lib:core:2.0"]]
"#;

#[allow(deprecated)]
fn depsight_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("depsight").unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("resolution.toml"), SNAPSHOT).unwrap();
    tmp
}

#[test]
fn test_insight_prints_report() {
    let tmp = setup();
    depsight_cmd(&tmp)
        .current_dir(tmp.path())
        .args([
            "insight",
            "--configuration",
            "runtimeClasspath",
            "--dependency",
            "lib:core",
            "--color",
            "never",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "lib:core:2.0 (by conflict resolution)\n└── org:app:1.0 (requested lib:core:1.0 -> 2.0)\n",
        ))
        .stdout(predicate::str::contains("--scan option."))
        .stderr(predicate::str::contains("Analyzing"));
}

#[test]
fn test_insight_reads_snapshot_path() {
    let tmp = setup();
    let snapshot = tmp.path().join("resolution.toml");
    depsight_cmd(&tmp)
        .args(["insight", "--configuration", "runtimeClasspath", "--dependency", "org:app"])
        .arg("--snapshot")
        .arg(&snapshot)
        .args(["--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "org:app:1.0\n└── runtimeClasspath (requested org:app:1.0)\n",
        ));
}

#[test]
fn test_insight_missing_inputs() {
    let tmp = setup();
    depsight_cmd(&tmp)
        .current_dir(tmp.path())
        .arg("insight")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input configuration was not specified"))
        .stderr(predicate::str::contains("dependency to show was not specified"));
}

#[test]
fn test_insight_no_match() {
    let tmp = setup();
    depsight_cmd(&tmp)
        .current_dir(tmp.path())
        .args([
            "insight",
            "--configuration",
            "runtimeClasspath",
            "--dependency",
            "com.missing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No dependencies matching given input were found in configuration 'runtimeClasspath'",
        ));
}

#[test]
fn test_insight_conflict_fails() {
    let tmp = setup();
    depsight_cmd(&tmp)
        .current_dir(tmp.path())
        .args([
            "insight",
            "--configuration",
            "conflicted",
            "--dependency",
            "lib:core",
            "--color",
            "never",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "There were conflicts between the following modules",
        ))
        .stdout(predicate::str::contains("   - lib:core:1.0\n"))
        .stderr(predicate::str::contains(
            "Could not resolve all dependencies for configuration 'conflicted'.",
        ));
}

#[test]
fn test_insight_missing_snapshot() {
    let tmp = TempDir::new().unwrap();
    depsight_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["insight", "--configuration", "x", "--dependency", "y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_invalid_color_rejected() {
    let tmp = setup();
    depsight_cmd(&tmp)
        .args(["insight", "--color", "sometimes"])
        .assert()
        .failure();
}
