//! Application service: move a tag to a published version.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use sd_cmd_common::TagPointer;

use crate::application::ports::{MetadataApi, ProgressReporter};
use crate::domain::error::CmdError;
use crate::domain::reference::CommandReference;

/// Outcome of the `promote` use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoteOutcome {
    /// The tag already pointed at the requested version; nothing was sent.
    AlreadyTagged { version: String },
    /// The tag now points at the requested version.
    Promoted(TagPointer),
}

/// Point `tag` of `namespace/name` at `target_version`.
///
/// # Errors
///
/// Returns `InvalidTagName` for a malformed tag, and any API failure other
/// than the 404 that means the tag does not exist yet.
pub fn promote(
    api: &impl MetadataApi,
    reporter: &impl ProgressReporter,
    namespace: &str,
    name: &str,
    target_version: &str,
    tag: &str,
) -> Result<PromoteOutcome, CmdError> {
    let tagged = CommandReference::tagged(namespace, name, tag)?;
    reporter.step(&format!("Promoting {namespace}/{name}@{target_version} to {tag}"));

    match api.resolve(&tagged) {
        Ok(current) if current.version == target_version => {
            reporter.success(&format!(
                "{namespace}/{name}@{target_version} is already tagged with {tag}"
            ));
            return Ok(PromoteOutcome::AlreadyTagged {
                version: current.version,
            });
        }
        Ok(current) => {
            reporter.step(&format!("Removing {} from {tag}", current.version));
        }
        Err(e) if e.is_not_found() => {
            tracing::debug!(%tagged, "tag not found, creating it");
            reporter.step(&format!("Tag {tag} does not exist yet"));
        }
        Err(e) => return Err(e),
    }

    let pointer = api.tag(namespace, name, target_version, tag)?;
    reporter.success(&format!(
        "Promoted {}/{}@{} to {}",
        pointer.namespace, pointer.name, pointer.version, pointer.tag
    ));
    Ok(PromoteOutcome::Promoted(pointer))
}
