//! Application service: publish a command version and tag it.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use sd_cmd_common::CommandSpec;

use crate::application::ports::{MetadataApi, ProgressReporter};
use crate::application::services::promote::{PromoteOutcome, promote};
use crate::domain::cache::format_file;
use crate::domain::error::CmdError;
use crate::domain::reference::is_valid_tag;

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub spec: CommandSpec,
    pub tag: PromoteOutcome,
}

/// Artifact to upload alongside `spec`, resolved against the manifest's
/// directory unless already absolute.
#[must_use]
pub fn artifact_path(spec: &CommandSpec, manifest_path: &Path) -> Option<PathBuf> {
    let file = format_file(spec)?;
    let file = Path::new(file);
    if file.is_absolute() {
        return Some(file.to_path_buf());
    }
    let dir = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    Some(dir.join(file))
}

/// Publish `spec` (loaded from `manifest_path`) and point `tag` at the new version.
///
/// # Errors
///
/// Returns `InvalidTagName` before anything is sent, the publish failure,
/// or the promote failure after a successful publish (the version then
/// exists untagged).
pub fn publish(
    api: &impl MetadataApi,
    reporter: &impl ProgressReporter,
    spec: &CommandSpec,
    manifest_path: &Path,
    tag: &str,
) -> Result<Published, CmdError> {
    if !is_valid_tag(tag) {
        return Err(CmdError::InvalidTagName(tag.to_string()));
    }
    let artifact = artifact_path(spec, manifest_path);
    reporter.step(&format!("Publishing {}", spec.full_name()));
    tracing::debug!(
        command = %spec.full_name(),
        format = spec.format.name(),
        artifact = ?artifact,
        "publishing command"
    );

    let published = api.publish(spec, artifact.as_deref())?;
    reporter.success(&format!(
        "Published {}@{}",
        published.full_name(),
        published.version
    ));

    let tag = promote(
        api,
        reporter,
        &published.namespace,
        &published.name,
        &published.version,
        tag,
    )?;
    Ok(Published {
        spec: published,
        tag,
    })
}
