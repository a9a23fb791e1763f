//! `sd-cmd validate`: check a manifest with the API validator.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::validate::validate_manifest;
use crate::infra::manifest::read_manifest;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the command manifest
    #[arg(short = 'f', long = "file", default_value = "sd-command.yaml")]
    pub file: PathBuf,
}

/// # Errors
///
/// Returns an error listing every validator message if the manifest is
/// rejected, or if the manifest cannot be read or the API call fails.
pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let yaml = read_manifest(&args.file)?;
    let api = ctx.api()?;
    validate_manifest(&api, &yaml)?;
    ctx.output
        .success(&format!("{} is a valid command manifest", args.file.display()));
    Ok(())
}
