//! Application service: validate a manifest against the API validator.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::MetadataApi;
use crate::domain::error::CmdError;

/// # Errors
///
/// Returns `ValidationFailed` with every message when the validator rejects
/// the manifest, or the API failure when the call itself fails.
pub fn validate_manifest(api: &impl MetadataApi, manifest_yaml: &str) -> Result<(), CmdError> {
    let result = api.validate(manifest_yaml)?;
    if result.is_valid() {
        return Ok(());
    }
    Err(CmdError::ValidationFailed(result.messages()))
}
