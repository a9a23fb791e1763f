//! `sd-cmd publish`: publish a new command version from a manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::publish::publish;
use crate::infra::manifest::load_manifest;
use crate::output::TerminalReporter;

/// Arguments for the publish command.
#[derive(Args)]
pub struct PublishArgs {
    /// Path to the command manifest
    #[arg(short = 'f', long = "file", default_value = "sd-command.yaml")]
    pub file: PathBuf,

    /// Tag to point at the published version
    #[arg(short = 't', long = "tag", default_value = "latest")]
    pub tag: String,
}

/// Publish the manifest and tag the new version. Prints the version on stdout.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or the API rejects it.
pub fn run(ctx: &AppContext, args: &PublishArgs) -> Result<()> {
    let spec = load_manifest(&args.file)?;
    let api = ctx.api()?;
    let reporter = TerminalReporter::new(&ctx.output);

    let published = publish(&api, &reporter, &spec, &args.file, &args.tag)
        .with_context(|| format!("cannot publish {}", spec.full_name()))?;
    ctx.output.result(&published.spec.version);
    Ok(())
}
