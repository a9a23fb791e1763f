//! sd-cmd - resolve, install and run Screwdriver commands

use std::process::ExitCode;

use clap::Parser;

use sd_cmd::cli::{Cli, normalize_args};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
