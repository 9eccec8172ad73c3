//! Argument parsing and top-level error reporting.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::helpers::dodocker;

#[test]
fn no_args_shows_help_and_exits_two() {
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path()).assert().code(2).stderr(predicate::str::contains(
        "Run long-lived containers on a cheap DigitalOcean droplet",
    ));
}

#[test]
fn conventional_no_color_value_is_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dodocker(dir.path())
        .env("NO_COLOR", "1")
        .args(["config", "path"])
        .output()
        .expect("run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("config.yaml"));
    assert!(!stdout.contains('\u{1b}'));
}

#[test]
fn no_color_set_to_false_is_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .env("NO_COLOR", "false")
        .args(["config", "path"])
        .assert()
        .success();
}

#[test]
fn help_lists_every_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dodocker(dir.path()).arg("--help").output().expect("run");
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for command in ["list", "create", "delete", "ssh", "deploy", "config"] {
        assert!(help.contains(command), "missing {command} in:\n{help}");
    }
}

#[test]
fn version_flag_names_the_binary() {
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dodocker "));
}

#[test]
fn malformed_port_is_rejected_before_any_network_call() {
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .args(["deploy", "nginx", "-p", "80:http"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid port"));
}

#[test]
fn unsafe_image_reference_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .args(["--token", "t", "deploy", "nginx;reboot"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid image reference"));
}

#[test]
fn missing_token_fails_with_a_hint() {
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .args(["list", "droplets"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DIGITALOCEAN_TOKEN is not set"));
}

#[test]
fn token_is_read_from_dotenv_in_working_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".env"), "DIGITALOCEAN_TOKEN=from-dotenv\n").expect("write");
    // Unroutable API so the request fails fast after the token check passes.
    std::fs::write(
        dir.path().join("config.yaml"),
        "provider:\n  api_url: http://127.0.0.1:9/v2\n",
    )
    .expect("write");
    dodocker(dir.path())
        .args(["list", "droplets"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DIGITALOCEAN_TOKEN is not set").not());
}

#[test]
fn json_mode_reports_errors_as_objects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dodocker(dir.path())
        .args(["--json", "list", "keys"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "config_error");
}
