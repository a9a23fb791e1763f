//! Reads `sd-command.yaml` manifests.

use std::path::Path;

use sd_cmd_common::CommandSpec;

use crate::domain::error::CmdError;

/// Raw manifest text, as sent to the validator.
///
/// # Errors
///
/// Returns `CmdError::Manifest` if the file cannot be read.
pub fn read_manifest(path: &Path) -> Result<String, CmdError> {
    std::fs::read_to_string(path).map_err(|e| CmdError::Manifest {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Read and parse a manifest.
///
/// # Errors
///
/// Returns `CmdError::Manifest` if the file cannot be read or is not a
/// valid command manifest.
pub fn load_manifest(path: &Path) -> Result<CommandSpec, CmdError> {
    let text = read_manifest(path)?;
    serde_yaml::from_str(&text).map_err(|e| CmdError::Manifest {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}
