//! `sd-cmd removeTag`: delete a tag.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::remove_tag::remove_tag;
use crate::domain::reference::parse_command_name;
use crate::output::TerminalReporter;

/// Arguments for the removeTag command.
#[derive(Args)]
pub struct RemoveTagArgs {
    /// Command as namespace/name
    pub command: String,

    /// Tag to remove
    pub tag: String,
}

/// # Errors
///
/// Returns an error if the name or tag is invalid or the API call fails.
/// Removing a tag that does not exist succeeds.
pub fn run(ctx: &AppContext, args: &RemoveTagArgs) -> Result<()> {
    let (namespace, name) = parse_command_name(&args.command)?;
    let api = ctx.api()?;
    let reporter = TerminalReporter::new(&ctx.output);
    remove_tag(&api, &reporter, &namespace, &name, &args.tag)
        .with_context(|| format!("cannot remove tag {} from {}", args.tag, args.command))?;
    Ok(())
}
