//! Application service: delete a tag.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use sd_cmd_common::TagPointer;

use crate::application::ports::{MetadataApi, ProgressReporter};
use crate::domain::error::CmdError;
use crate::domain::reference::CommandReference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTagOutcome {
    /// The tag did not exist; nothing was sent.
    NotTagged,
    /// The tag was deleted; the pointer is what it referenced.
    Removed(TagPointer),
}

/// Remove `tag` from `namespace/name`. Removing an absent tag succeeds.
///
/// # Errors
///
/// Returns `InvalidTagName` for a malformed tag, and any API failure other
/// than the 404 that means the tag is absent.
pub fn remove_tag(
    api: &impl MetadataApi,
    reporter: &impl ProgressReporter,
    namespace: &str,
    name: &str,
    tag: &str,
) -> Result<RemoveTagOutcome, CmdError> {
    let tagged = CommandReference::tagged(namespace, name, tag)?;

    match api.resolve(&tagged) {
        Ok(current) => {
            reporter.step(&format!("Removing {tagged} (version {})", current.version));
        }
        Err(e) if e.is_not_found() => {
            reporter.warn(&format!("{tagged} does not exist yet"));
            return Ok(RemoveTagOutcome::NotTagged);
        }
        Err(e) => return Err(e),
    }

    let pointer = api.remove_tag(namespace, name, tag)?;
    reporter.success(&format!(
        "Removed {} from {}/{}@{}",
        pointer.tag, pointer.namespace, pointer.name, pointer.version
    ));
    Ok(RemoveTagOutcome::Removed(pointer))
}
