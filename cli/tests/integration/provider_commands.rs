//! Provider-backed commands against a mocked DigitalOcean API.

#![allow(clippy::expect_used)]

use predicates::prelude::*;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::dodocker;

fn droplets_body() -> serde_json::Value {
    serde_json::json!({
        "droplets": [
            {
                "id": 1,
                "name": "dodocker-a",
                "status": "active",
                "networks": {"v4": [
                    {"ip_address": "10.0.0.2", "type": "private"},
                    {"ip_address": "203.0.113.5", "type": "public"}
                ]}
            },
            {"id": 2, "name": "dodocker-b", "status": "new", "networks": {"v4": []}},
            {"id": 3, "name": "dodocker-c", "status": "off", "networks": {"v4": []}}
        ]
    })
}

async fn api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/droplets"))
        .and(query_param("per_page", "200"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(droplets_body()))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn list_droplets_shows_state_icons() {
    let server = api().await;
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .env("DIGITALOCEAN_TOKEN", "test-token")
        .env("DODOCKER_API_URL", format!("{}/v2", server.uri()))
        .args(["list", "droplets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🟢 dodocker-a (203.0.113.5)"))
        .stdout(predicate::str::contains("🟡 dodocker-b (starting up)"))
        .stdout(predicate::str::contains("🔴 dodocker-c (off)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_droplets_json_is_machine_readable() {
    let server = api().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dodocker(dir.path())
        .env("DIGITALOCEAN_TOKEN", "test-token")
        .env("DODOCKER_API_URL", format!("{}/v2", server.uri()))
        .args(["--json", "list", "droplets"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v[0]["state"], "active");
    assert_eq!(v[0]["address"], "203.0.113.5");
    assert_eq!(v[1]["state"], "pending");
    assert!(v[1]["address"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn list_keys_on_an_empty_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account/keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ssh_keys": []})))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .env("DIGITALOCEAN_TOKEN", "test-token")
        .env("DODOCKER_API_URL", format!("{}/v2", server.uri()))
        .args(["list", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No keys found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_droplet_fails() {
    let server = api().await;
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .env("DIGITALOCEAN_TOKEN", "test-token")
        .env("DODOCKER_API_URL", format!("{}/v2", server.uri()))
        .args(["--yes", "delete", "droplet", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Droplet nope not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_known_droplet_by_id() {
    let server = api().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/droplets/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .env("DIGITALOCEAN_TOKEN", "test-token")
        .env("DODOCKER_API_URL", format!("{}/v2", server.uri()))
        .args(["--yes", "delete", "droplet", "dodocker-c"])
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn dodocker_yes_env_deletes_without_prompting() {
    let server = api().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/droplets/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .env("DIGITALOCEAN_TOKEN", "test-token")
        .env("DODOCKER_API_URL", format!("{}/v2", server.uri()))
        .env("DODOCKER_YES", "1")
        .args(["--json", "delete", "droplet", "dodocker-c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_surfaces_provider_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/droplets"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"id":"Unauthorized","message":"Unable to authenticate you"}"#,
        ))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    dodocker(dir.path())
        .env("DIGITALOCEAN_TOKEN", "bad")
        .env("DODOCKER_API_URL", format!("{}/v2", server.uri()))
        .args(["list", "droplets"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HTTP 401"))
        .stderr(predicate::str::contains("Unable to authenticate you"));
}
