//! Layout of the local command cache.
//!
//! `{root}/{namespace}/{name}/{version}/{basename(file)}`. Pure path
//! arithmetic; no filesystem access.

use std::path::{Path, PathBuf};

use sd_cmd_common::{CommandSpec, Format, HabitatMode};

use crate::domain::error::CmdError;

/// The artifact file a spec refers to, if it has one.
///
/// Binary commands always have one; habitat commands only in local mode.
#[must_use]
pub fn format_file(spec: &CommandSpec) -> Option<&str> {
    match &spec.format {
        Format::Binary { binary } => Some(binary.file.as_str()),
        Format::Habitat { habitat } if habitat.mode == HabitatMode::Local => {
            habitat.file.as_deref()
        }
        Format::Habitat { .. } | Format::Docker { .. } => None,
    }
}

/// Directory holding every file of one resolved command version.
///
/// # Errors
///
/// Returns `InvalidSpec` if namespace, name or version cannot be used as a
/// single path segment.
pub fn command_dir(root: &Path, spec: &CommandSpec) -> Result<PathBuf, CmdError> {
    let mut dir = root.to_path_buf();
    for (what, segment) in [
        ("namespace", &spec.namespace),
        ("name", &spec.name),
        ("version", &spec.version),
    ] {
        check_segment(what, segment)?;
        dir.push(segment);
    }
    Ok(dir)
}

/// Cache location of the artifact of `spec`.
///
/// # Errors
///
/// Returns `InvalidSpec` if the format has no artifact file or any path
/// component is unusable.
pub fn cache_path(root: &Path, spec: &CommandSpec) -> Result<PathBuf, CmdError> {
    let file = format_file(spec).ok_or_else(|| {
        CmdError::InvalidSpec(format!(
            "{}@{} ({}) has no artifact file",
            spec.full_name(),
            spec.version,
            spec.format.name()
        ))
    })?;
    let basename = Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CmdError::InvalidSpec(format!("'{file}' has no file name")))?;
    check_segment("file", basename)?;
    Ok(command_dir(root, spec)?.join(basename))
}

fn check_segment(what: &str, segment: &str) -> Result<(), CmdError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        return Err(CmdError::InvalidSpec(format!(
            "{what} '{segment}' is not a valid path segment"
        )));
    }
    Ok(())
}
