//! `sd-cmd promote`: point a tag at a published version.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::promote::promote;
use crate::domain::reference::parse_command_name;
use crate::output::TerminalReporter;

/// Arguments for the promote command.
#[derive(Args)]
pub struct PromoteArgs {
    /// Command as namespace/name
    pub command: String,

    /// Version to promote
    pub target_version: String,

    /// Tag to move
    pub tag: String,
}

/// # Errors
///
/// Returns an error if the name or tag is invalid or the API call fails.
pub fn run(ctx: &AppContext, args: &PromoteArgs) -> Result<()> {
    let (namespace, name) = parse_command_name(&args.command)?;
    let api = ctx.api()?;
    let reporter = TerminalReporter::new(&ctx.output);
    promote(&api, &reporter, &namespace, &name, &args.target_version, &args.tag).with_context(
        || {
            format!(
                "cannot promote {}@{} to {}",
                args.command, args.target_version, args.tag
            )
        },
    )?;
    Ok(())
}
