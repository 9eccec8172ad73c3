//! `dodocker config` against real settings files.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::helpers::dodocker;

#[test]
fn path_honours_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let expected = dir.path().join("config.yaml");
    dodocker(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn show_prints_defaults_without_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("region: fra1"))
        .stdout(predicate::str::contains("size: s-1vcpu-1gb"));
}

#[test]
fn show_json_merges_file_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("config.yaml"),
        "provider:\n  region: ams3\ntiming:\n  max_boot_polls: 60\n",
    )
    .expect("write");
    let output = dodocker(dir.path())
        .args(["--json", "config", "show"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["provider"]["region"], "ams3");
    assert_eq!(v["provider"]["size"], "s-1vcpu-1gb");
    assert_eq!(v["timing"]["max_boot_polls"], 60);
}

#[test]
fn invalid_settings_name_the_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("config.yaml"), "timing:\n  reach_attempts: 0\n").expect("write");
    dodocker(dir.path())
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timing.reach_attempts"));
}
