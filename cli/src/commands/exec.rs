//! `sd-cmd exec`: resolve, install and run a command.

use std::io::IsTerminal;
use std::process::{ExitCode, ExitStatus};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{MetadataApi, StdinMode};
use crate::application::services::executor::Executor;
use crate::domain::reference::scan_args;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::logging::{self, LogSettings, log_file_path};

/// Arguments for the exec command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct ExecArgs {
    /// Print debug diagnostics to stderr
    #[arg(long)]
    pub debug: bool,

    /// Also write debug diagnostics to $SD_ARTIFACTS_DIR/.sd/commands/...
    #[arg(long)]
    pub log_file: bool,

    /// namespace/name@version, followed by the arguments for the command
    #[arg(required = true, allow_hyphen_values = true, value_name = "REFERENCE [ARGS]")]
    pub args: Vec<String>,
}

/// Run a command reference with the arguments that follow it.
///
/// The tool's exit code mirrors the command's.
///
/// # Errors
///
/// Returns an error if no reference is found, or resolution, fetch, install
/// or spawn fails.
pub async fn run(ctx: &AppContext, args: &ExecArgs) -> Result<ExitCode> {
    let (reference, position) = scan_args(&args.args)?;

    let log_file = (args.log_file || ctx.config.cmd_debug_log).then(|| {
        log_file_path(&ctx.config.artifacts_dir, &reference, Utc::now().timestamp())
    });
    logging::init(&LogSettings {
        debug: args.debug,
        log_file,
    });

    if position > 0 {
        tracing::warn!(
            ignored = ?&args.args[..position],
            "ignoring arguments before the command reference"
        );
    }
    let command_args = &args.args[position + 1..];
    tracing::debug!(%reference, args = ?command_args, "exec");

    let api = ctx.api()?;
    let spec = api
        .resolve(&reference)
        .with_context(|| format!("cannot resolve {reference}"))?;

    let store = ctx.store()?;
    let cache = ctx.cache();
    let label = format!("cannot run {}@{}", spec.full_name(), spec.version);
    let launch = tokio::task::spawn_blocking(move || {
        Executor::new(&spec, &store, &cache, &TokioCommandRunner::new())?.prepare()
    })
    .await
    .context("install task failed")?
    .context(label.clone())?;

    let stdin = if std::io::stdin().is_terminal() {
        StdinMode::Null
    } else {
        StdinMode::Inherit
    };
    let status = launch
        .run(&TokioCommandRunner::new(), command_args, stdin)
        .await
        .context(label)?;

    tracing::debug!(?status, "command finished");
    Ok(ExitCode::from(exit_code(status)))
}

/// Process exit code mirroring `status`; a signal-terminated child maps to 1.
#[must_use]
pub fn exit_code(status: ExitStatus) -> u8 {
    match status.code() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(code) => code as u8,
        None => 1,
    }
}
