//! Tests for the `remove_tag` application service.

#![allow(clippy::expect_used)]

use sd_cmd::application::services::remove_tag::{RemoveTagOutcome, remove_tag};
use sd_cmd::domain::error::CmdError;

use crate::mocks::{FakeApi, RecordingReporter, binary, spec};

#[test]
fn test_remove_existing_tag() {
    let api = FakeApi::new()
        .with_published(spec("foo", "bar", "1.0.0", binary("step")))
        .with_tag("foo", "bar", "stable", "1.0.0");
    let reporter = RecordingReporter::default();

    let outcome = remove_tag(&api, &reporter, "foo", "bar", "stable").expect("remove");

    let RemoveTagOutcome::Removed(pointer) = outcome else {
        panic!("expected Removed, got {outcome:?}");
    };
    assert_eq!(pointer.version, "1.0.0");
    assert!(api.tagged_version("foo", "bar", "stable").is_none());
    assert!(reporter.contains("Removed stable from foo/bar@1.0.0"));
}

#[test]
fn test_remove_absent_tag_succeeds_without_delete() {
    let api = FakeApi::new().with_published(spec("foo", "bar", "1.0.0", binary("step")));
    let reporter = RecordingReporter::default();

    let outcome = remove_tag(&api, &reporter, "foo", "bar", "stable").expect("remove");

    assert_eq!(outcome, RemoveTagOutcome::NotTagged);
    assert!(api.remove_calls.borrow().is_empty());
    assert!(reporter.contains("warn: foo/bar@stable does not exist yet"));
}

#[test]
fn test_remove_tag_propagates_server_error() {
    let api = FakeApi::new();
    api.resolve_status.set(Some(503));
    let reporter = RecordingReporter::default();

    let err = remove_tag(&api, &reporter, "foo", "bar", "stable").expect_err("503");
    assert!(matches!(err, CmdError::Server { status: 503, .. }));
    assert!(api.remove_calls.borrow().is_empty());
}

#[test]
fn test_remove_tag_rejects_version_as_tag() {
    let api = FakeApi::new();
    let reporter = RecordingReporter::default();

    let err = remove_tag(&api, &reporter, "foo", "bar", "1.0.0").expect_err("version");
    assert!(matches!(err, CmdError::InvalidTagName(t) if t == "1.0.0"));
    assert_eq!(api.resolve_calls.get(), 0);
}
