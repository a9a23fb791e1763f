//! Tests for the `Executor` application service.
//!
//! The Store and the process layer are doubles; the cache is the real
//! `LocalCache` on a temp dir so the install-once behaviour is observed on
//! disk.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use sd_cmd::application::ports::{ArtifactCache, StdinMode};
use sd_cmd::application::services::executor::{Executor, HAB_PATH, Launch};
use sd_cmd::domain::error::{CmdError, Service};
use sd_cmd::infra::cache::LocalCache;
use sd_cmd::infra::command_runner::TokioCommandRunner;
use sd_cmd_common::HabitatMode;

use crate::mocks::{CountingStore, RecordingRunner, binary, docker, habitat, spec};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[tokio::test]
async fn test_binary_is_fetched_once_and_run_from_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"#!/bin/sh\n");
    let runner = RecordingRunner::default();
    let s = spec("foo", "bar", "1.0.1", binary("./sd-step"));

    let executor = Executor::new(&s, &store, &cache, &runner).expect("binary is supported");
    executor
        .run(&args(&["a"]), StdinMode::Inherit)
        .await
        .expect("first run");
    executor
        .run(&args(&["b"]), StdinMode::Inherit)
        .await
        .expect("second run");

    assert_eq!(store.calls.get(), 1, "second run must not fetch");
    let expected = dir.path().join("foo/bar/1.0.1/sd-step");
    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].program, expected);
    assert_eq!(invocations[0].args, vec!["a"]);
    assert_eq!(invocations[1].args, vec!["b"]);
    assert_eq!(invocations[1].stdin, StdinMode::Inherit);
}

#[test]
fn test_prepare_installs_without_spawning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"#!/bin/sh\n");
    let runner = RecordingRunner::default();
    let s = spec("foo", "bar", "1.0.1", binary("sd-step"));

    // No async runtime here: prepare does its Store and cache work inline.
    let launch = Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .prepare()
        .expect("prepared");

    assert_eq!(
        launch,
        Launch::Binary {
            path: dir.path().join("foo/bar/1.0.1/sd-step")
        }
    );
    assert_eq!(store.calls.get(), 1);
    assert!(cache.is_installed(&s));
    assert!(runner.invocations().is_empty());
}

#[tokio::test]
async fn test_launch_prepared_on_blocking_thread() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().to_path_buf();
    let s = spec("foo", "bar", "1.0.1", binary("step"));

    let prepared = s.clone();
    let launch = tokio::task::spawn_blocking(move || {
        let cache = LocalCache::new(root);
        let store = CountingStore::serving(b"x");
        Executor::new(&prepared, &store, &cache, &TokioCommandRunner::new())?.prepare()
    })
    .await
    .expect("join")
    .expect("prepared");

    let runner = RecordingRunner::with_exit_codes(&[4]);
    let status = launch
        .run(&runner, &args(&["z"]), StdinMode::Null)
        .await
        .expect("spawned");
    assert_eq!(status.code(), Some(4));
    assert_eq!(runner.invocations()[0].program, dir.path().join("foo/bar/1.0.1/step"));
    assert_eq!(runner.invocations()[0].args, vec!["z"]);
}

#[test]
fn test_prepare_habitat_remote_fetches_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"");
    let runner = RecordingRunner::default();
    let s = spec(
        "foo",
        "git",
        "2.0.0",
        habitat(HabitatMode::Remote, "core/git/2.14.1", None, "git"),
    );

    let launch = Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .prepare()
        .expect("prepared");

    assert_eq!(
        launch,
        Launch::Habitat {
            hab_path: PathBuf::from(HAB_PATH),
            install_source: "core/git/2.14.1".to_string(),
            package: "core/git/2.14.1".to_string(),
            command: "git".to_string(),
        }
    );
    assert_eq!(store.calls.get(), 0);
}

#[tokio::test]
async fn test_non_zero_exit_is_returned_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"x");
    let runner = RecordingRunner::with_exit_codes(&[3]);
    let s = spec("foo", "bar", "1.0.1", binary("step"));

    let status = Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .run(&[], StdinMode::Null)
        .await
        .expect("spawned");
    assert_eq!(status.code(), Some(3));
}

#[tokio::test]
async fn test_fetch_failure_spawns_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::failing(500);
    let runner = RecordingRunner::default();
    let s = spec("foo", "bar", "1.0.1", binary("step"));

    let err = Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .run(&[], StdinMode::Null)
        .await
        .expect_err("store failure");
    assert!(matches!(
        err,
        CmdError::Server {
            service: Service::Store,
            status: 500
        }
    ));
    assert!(runner.invocations().is_empty());
    assert!(!cache.is_installed(&s));
}

#[tokio::test]
async fn test_install_failure_spawns_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A plain file where the namespace directory should go.
    std::fs::write(dir.path().join("foo"), b"not a dir").expect("write");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"x");
    let runner = RecordingRunner::default();
    let s = spec("foo", "bar", "1.0.1", binary("step"));

    let err = Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .run(&[], StdinMode::Null)
        .await
        .expect_err("install failure");
    assert!(matches!(err, CmdError::Install { .. }), "got {err:?}");
    assert!(runner.invocations().is_empty());
}

#[tokio::test]
async fn test_empty_cached_file_is_refetched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let s = spec("foo", "bar", "1.0.1", binary("step"));
    let path = cache.path_for(&s).expect("path");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, b"").expect("write");

    let store = CountingStore::serving(b"payload");
    let runner = RecordingRunner::default();
    Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .run(&[], StdinMode::Null)
        .await
        .expect("run");

    assert_eq!(store.calls.get(), 1);
    assert_eq!(std::fs::read(&path).expect("read"), b"payload");
}

#[tokio::test]
async fn test_habitat_remote_installs_by_package_then_execs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"");
    let runner = RecordingRunner::default();
    let s = spec(
        "foo",
        "git",
        "2.0.0",
        habitat(HabitatMode::Remote, "core/git/2.14.1", None, "git"),
    );

    Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .run(&args(&["--version"]), StdinMode::Inherit)
        .await
        .expect("run");

    assert_eq!(store.calls.get(), 0, "remote packages are not fetched");
    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].program, PathBuf::from(HAB_PATH));
    assert_eq!(invocations[0].args, vec!["pkg", "install", "core/git/2.14.1"]);
    assert_eq!(invocations[0].stdin, StdinMode::Null);
    assert_eq!(
        invocations[1].args,
        vec!["pkg", "exec", "core/git/2.14.1", "git", "--version"]
    );
    assert_eq!(invocations[1].stdin, StdinMode::Inherit);
}

#[tokio::test]
async fn test_habitat_local_installs_cached_archive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"hart bytes");
    let runner = RecordingRunner::default();
    let s = spec(
        "foo",
        "bar",
        "1.0.0",
        habitat(HabitatMode::Local, "foo/bar", Some("./foobar.hart"), "foobar"),
    );

    Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .with_hab_path("/usr/local/bin/hab")
        .run(&args(&["x"]), StdinMode::Null)
        .await
        .expect("run");

    let archive = dir.path().join("foo/bar/1.0.0/foobar.hart");
    assert_eq!(std::fs::read(&archive).expect("cached"), b"hart bytes");
    let invocations = runner.invocations();
    assert_eq!(invocations[0].program, PathBuf::from("/usr/local/bin/hab"));
    assert_eq!(
        invocations[0].args,
        vec![
            "pkg".to_string(),
            "install".to_string(),
            archive.to_string_lossy().into_owned()
        ]
    );
    assert_eq!(invocations[1].args, vec!["pkg", "exec", "foo/bar", "foobar", "x"]);
}

#[tokio::test]
async fn test_failed_habitat_install_skips_exec() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"");
    let runner = RecordingRunner::with_exit_codes(&[7]);
    let s = spec(
        "foo",
        "git",
        "2.0.0",
        habitat(HabitatMode::Remote, "core/git/2.14.1", None, "git"),
    );

    let status = Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .run(&[], StdinMode::Null)
        .await
        .expect("run");

    assert_eq!(status.code(), Some(7));
    assert_eq!(runner.invocations().len(), 1);
}

#[test]
fn test_docker_is_unsupported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(b"");
    let runner = RecordingRunner::default();
    let s = spec("foo", "bar", "1.0.0", docker("alpine:3"));

    let result = Executor::new(&s, &store, &cache, &runner);
    assert!(matches!(result, Err(CmdError::UnsupportedFormat(f)) if f == "docker"));
    assert_eq!(store.calls.get(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_installed_script_runs_with_arguments() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::new(dir.path());
    let store = CountingStore::serving(
        b"#!/bin/sh\necho Hello World\nfor arg in \"$@\"; do echo \"$arg\"; done\n",
    );
    let runner = TokioCommandRunner::new();
    let s = spec("foo", "hello", "1.0.0", binary("hello.sh"));

    let status = Executor::new(&s, &store, &cache, &runner)
        .expect("supported")
        .run(&args(&["arg1", "arg2"]), StdinMode::Null)
        .await
        .expect("run");

    assert!(status.success());
    assert!(cache.is_installed(&s));
}
