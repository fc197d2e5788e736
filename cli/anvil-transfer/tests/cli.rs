// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Command-line surface tests

// Allow deprecated - cargo_bin is standard for CLI testing
#![allow(deprecated)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use predicates::prelude::*;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY_PEM: &str = include_str!("fixtures/test_key.pem");

const ENV_VARS: &[&str] = &[
    "ANVIL_TRANSFER_ENV",
    "GOOGLE_SERVICE_ACCOUNT_CREDENTIALS_BASE64",
    "PORTAL_KEY",
    "PORTAL_SECRET_KEY",
    "TERRA_API_URL",
    "PORTAL_API_URL",
];

fn transfer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("anvil-transfer").expect("Failed to find anvil-transfer binary");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_flags() {
    transfer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--env"))
        .stdout(predicate::str::contains(
            "--google-service-account-credentials-base64",
        ))
        .stdout(predicate::str::contains("--portal-key"))
        .stdout(predicate::str::contains("--portal-secret-key"))
        .stdout(predicate::str::contains("--delete-source-files"));
}

#[test]
fn test_version() {
    transfer_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("anvil-transfer"));
}

#[test]
fn test_missing_arguments_fail() {
    transfer_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"))
        .stderr(predicate::str::contains("--env"));
}

#[test]
fn test_unknown_environment_rejected() {
    transfer_cmd()
        .args([
            "--env",
            "staging",
            "--google-service-account-credentials-base64",
            "e30=",
            "--portal-key",
            "k",
            "--portal-secret-key",
            "s",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"))
        .stderr(predicate::str::contains("sandbox"));
}

#[test]
fn test_arguments_read_from_environment() {
    // Everything supplied through env vars; the bogus credentials fail
    // before any network call is made.
    transfer_cmd()
        .env("ANVIL_TRANSFER_ENV", "sandbox")
        .env("GOOGLE_SERVICE_ACCOUNT_CREDENTIALS_BASE64", "not base64!")
        .env("PORTAL_KEY", "k")
        .env("PORTAL_SECRET_KEY", "s")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to load Google service account credentials",
        ));
}

#[test]
fn test_secret_env_values_hidden_from_help() {
    transfer_cmd()
        .env("PORTAL_SECRET_KEY", "hunter2")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
}

#[tokio::test]
async fn test_run_logs_summary_counts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.cli",
            "expires_in": 3599,
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/workspaces/v1/.+/getSasToken$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "sig=cli" })),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexer-info"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "is_indexing": false })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "@graph": [],
            "notification": "No results found",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = serde_json::json!({
        "type": "service_account",
        "private_key": TEST_KEY_PEM,
        "client_email": "anvil-transfer@igvf-anvil.iam.gserviceaccount.com",
        "token_uri": format!("{}/token", server.uri()),
    });
    let mut cmd = transfer_cmd();
    cmd.env("RUST_LOG", "anvil_transfer=info")
        .env("NO_COLOR", "1")
        .args(["--env", "sandbox", "--portal-key", "k", "--portal-secret-key", "s"])
        .arg("--google-service-account-credentials-base64")
        .arg(STANDARD.encode(key.to_string()))
        .arg("--portal-api-url")
        .arg(server.uri())
        .arg("--terra-api-url")
        .arg(server.uri());

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();

    output.assert().success().stderr(predicate::str::is_match(
        r"Run finished.*candidates.*0.*skipped.*0.*transferred.*0.*deleted.*0",
    )
    .unwrap());
    server.verify().await;
}
