//! CLI argument parsing with clap derive

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;
use crate::infra::logging::{self, LogSettings};

/// Resolve, install and run Screwdriver commands
#[derive(Parser)]
#[command(
    name = "sd-cmd",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a command: sd-cmd exec namespace/name@version [args...]
    Exec(commands::exec::ExecArgs),

    /// Publish a new command version
    Publish(commands::publish::PublishArgs),

    /// Validate a command manifest
    Validate(commands::validate::ValidateArgs),

    /// Point a tag at a published version
    Promote(commands::promote::PromoteArgs),

    /// Remove a tag
    #[command(name = "removeTag", alias = "remove-tag")]
    RemoveTag(commands::remove_tag::RemoveTagArgs),

    /// Show version
    Version,
}

/// Subcommand names and aliases recognised in first position.
const SUBCOMMANDS: &[&str] = &[
    "exec",
    "publish",
    "validate",
    "promote",
    "removeTag",
    "remove-tag",
    "version",
    "help",
];

/// Flags that are handled by clap itself when they come first.
const TOP_LEVEL_FLAGS: &[&str] = &["-h", "--help", "-V", "--version"];

/// Global flags that may precede the subcommand.
const GLOBAL_FLAGS: &[&str] = &["-q", "--quiet", "--no-color"];

/// Insert `exec` when the first non-global token is not a subcommand.
///
/// `sd-cmd ns/name@1.0.0 arg` becomes `sd-cmd exec ns/name@1.0.0 arg`.
#[must_use]
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let first = args
        .iter()
        .skip(1)
        .position(|a| !GLOBAL_FLAGS.iter().any(|f| a.to_str() == Some(*f)))
        .map(|i| i + 1);
    let Some(index) = first else {
        return args;
    };
    let is_known = {
        let token = args[index].to_string_lossy();
        SUBCOMMANDS.contains(&&*token) || TOP_LEVEL_FLAGS.contains(&&*token)
    };
    if is_known {
        return args;
    }
    args.insert(index, OsString::from("exec"));
    args
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;

        if let Command::Version = command {
            commands::version::run();
            return Ok(ExitCode::SUCCESS);
        }

        let config = crate::infra::config::load_from_env()?;
        let ctx = AppContext::new(&OutputFlags { no_color, quiet }, config);

        if let Command::Exec(args) = &command {
            return commands::exec::run(&ctx, args).await;
        }

        logging::init(&LogSettings::default());
        match command {
            Command::Publish(args) => commands::publish::run(&ctx, &args)?,
            Command::Validate(args) => commands::validate::run(&ctx, &args)?,
            Command::Promote(args) => commands::promote::run(&ctx, &args)?,
            Command::RemoveTag(args) => commands::remove_tag::run(&ctx, &args)?,
            Command::Exec(_) | Command::Version => {}
        }
        Ok(ExitCode::SUCCESS)
    }
}
