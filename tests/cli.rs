//
//  moysklad-cli
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end runs of the `msk` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's configuration and credentials.
fn msk(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("msk").unwrap();
    cmd.env("MSK_CONFIG_DIR", config_dir.path())
        .env_remove("MSK_HOST")
        .env_remove("MOYSKLAD_TOKEN")
        .env_remove("MOYSKLAD_LOGIN")
        .env_remove("MOYSKLAD_PASSWORD");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    msk(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("entity"))
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("api"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    msk(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("msk version "));
}

#[test]
fn test_config_round_trip() {
    let dir = TempDir::new().unwrap();

    msk(&dir)
        .args(["config", "set", "timeout", "45"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").is_file());

    msk(&dir)
        .args(["config", "get", "timeout"])
        .assert()
        .success()
        .stdout("45\n");

    msk(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();

    msk(&dir)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    msk(&dir)
        .args(["config", "set", "output", "yaml"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_entity_kind_is_rejected() {
    let dir = TempDir::new().unwrap();
    msk(&dir)
        .env("MOYSKLAD_TOKEN", "test-token")
        .args(["entity", "get", "gadget", "1"])
        .assert()
        .failure();
}

#[test]
fn test_api_get_against_mock_server() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/remap/1.2/entity/currency")
        .match_query(mockito::Matcher::UrlEncoded("limit".into(), "1".into()))
        .match_header("authorization", "Bearer test-token")
        .with_header("content-type", "application/json")
        .with_body(r#"{"rows":[{"name":"руб","isoCode":"RUB"}]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    msk(&dir)
        .env("MOYSKLAD_TOKEN", "test-token")
        .args(["--host", &server.url(), "api", "entity/currency", "-q", "limit=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RUB"));

    mock.assert();
}

#[test]
fn test_api_not_found_exit_code() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/remap/1.2/entity/product/missing")
        .with_status(404)
        .with_body(r#"{"errors":[{"error":"Объект не найден","code":1021}]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    msk(&dir)
        .env("MOYSKLAD_TOKEN", "test-token")
        .args(["--host", &server.url(), "api", "entity/product/missing"])
        .assert()
        .code(8)
        .stdout(predicate::str::contains("1021"));
}
