//! End-to-end tests for `sd-cmd exec`.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::stub_server::{Reply, StubServer, binary_spec};

const HELLO: &[u8] = b"#!/bin/sh\necho Hello World\nfor arg in \"$@\"; do echo \"$arg\"; done\n";

struct Fixture {
    server: StubServer,
    commands: TempDir,
    artifacts: TempDir,
}

impl Fixture {
    /// Stub serving `foo/hello@1.0.0` with `script` as its binary.
    fn hello(script: &[u8]) -> Self {
        let server = StubServer::start();
        server.route(
            "GET",
            "/v4/commands/foo/hello/1.0.0",
            Reply::json(200, &binary_spec("foo", "hello", "1.0.0", "./hello.sh")),
        );
        server.route(
            "GET",
            "/store/v1/commands/foo/hello/1.0.0",
            Reply::bytes("application/octet-stream", script),
        );
        Self {
            server,
            commands: tempfile::tempdir().expect("tempdir"),
            artifacts: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn sd_cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sd-cmd"));
        cmd.env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("SD_CMD_DEBUG_LOG")
            .env("SD_API_URL", self.server.api_url())
            .env("SD_STORE_URL", self.server.store_url())
            .env("SD_TOKEN", "test-token")
            .env("SD_BASE_COMMAND_PATH", self.commands.path())
            .env("SD_ARTIFACTS_DIR", self.artifacts.path());
        cmd
    }

    fn store_fetches(&self) -> usize {
        self.server
            .hits("GET", "/store/v1/commands/foo/hello/1.0.0")
            .len()
    }
}

#[test]
fn test_exec_runs_binary_with_arguments() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd()
        .args(["exec", "foo/hello@1.0.0", "arg1", "arg2"])
        .assert()
        .success()
        .stdout("Hello World\narg1\narg2\n");

    let installed = fx.commands.path().join("foo/hello/1.0.0/hello.sh");
    assert_eq!(std::fs::read(&installed).expect("installed"), HELLO);
}

#[test]
fn test_exec_sends_bearer_token() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd().args(["exec", "foo/hello@1.0.0"]).assert().success();

    for request in fx.server.requests() {
        assert_eq!(
            request.header("Authorization"),
            Some("Bearer test-token"),
            "{} {}",
            request.method,
            request.path
        );
    }
}

#[test]
fn test_second_exec_uses_cache() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd().args(["exec", "foo/hello@1.0.0"]).assert().success();
    fx.sd_cmd()
        .args(["exec", "foo/hello@1.0.0", "again"])
        .assert()
        .success()
        .stdout("Hello World\nagain\n");

    assert_eq!(fx.store_fetches(), 1);
    assert_eq!(fx.server.hits("GET", "/v4/commands/foo/hello/1.0.0").len(), 2);
}

#[test]
fn test_reference_first_runs_implicit_exec() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd()
        .args(["foo/hello@1.0.0", "-x", "--flag"])
        .assert()
        .success()
        .stdout("Hello World\n-x\n--flag\n");
}

#[test]
fn test_exit_code_mirrors_command() {
    let fx = Fixture::hello(b"#!/bin/sh\necho failing >&2\nexit 3\n");

    fx.sd_cmd()
        .args(["exec", "foo/hello@1.0.0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failing"));
}

#[test]
fn test_store_server_error_fails_without_running() {
    let fx = Fixture::hello(HELLO);
    fx.server.route(
        "GET",
        "/store/v1/commands/foo/hello/1.0.0",
        Reply::bytes("text/plain", b"boom").with_status(500),
    );

    fx.sd_cmd()
        .args(["exec", "foo/hello@1.0.0"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Store API has internal server error"));

    assert!(!fx.commands.path().join("foo/hello/1.0.0/hello.sh").exists());
}

#[test]
fn test_unknown_command_reports_api_error() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd()
        .args(["exec", "foo/missing@1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot resolve foo/missing@1.0.0"))
        .stderr(predicate::str::contains("404 Not Found"));
    assert_eq!(fx.store_fetches(), 0);
}

#[test]
fn test_docker_command_is_unsupported() {
    let fx = Fixture::hello(HELLO);
    fx.server.route(
        "GET",
        "/v4/commands/foo/dock/1.0.0",
        Reply::json(
            200,
            &serde_json::json!({
                "namespace": "foo",
                "name": "dock",
                "version": "1.0.0",
                "format": "docker",
                "docker": {"image": "alpine:3", "command": "sh"},
            }),
        ),
    );

    fx.sd_cmd()
        .args(["exec", "foo/dock@1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported format: docker"));
}

#[test]
fn test_missing_reference_is_an_error() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd()
        .args(["exec", "foo", "bar"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no command reference"));
    assert!(fx.server.requests().is_empty());
}

#[test]
fn test_missing_api_url_is_reported() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd()
        .env_remove("SD_API_URL")
        .args(["exec", "foo/hello@1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("SD_API_URL is not set"));
}

#[test]
fn test_log_file_is_written_under_artifacts_dir() {
    let fx = Fixture::hello(HELLO);

    fx.sd_cmd()
        .args(["exec", "--log-file", "foo/hello@1.0.0"])
        .assert()
        .success();

    let log_dir = fx.artifacts.path().join(".sd/commands/foo/hello/1.0.0");
    let logs = log_files(&log_dir);
    assert_eq!(logs.len(), 1, "expected one log in {}", log_dir.display());
    let content = std::fs::read_to_string(&logs[0]).expect("read log");
    assert!(content.contains("foo/hello@1.0.0"), "log was: {content}");
}

fn log_files(dir: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("log"))
                .collect()
        })
        .unwrap_or_default()
}
