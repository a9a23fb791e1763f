//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` spawns the command with stdout and stderr inherited,
//! so output reaches the terminal unbuffered and in order.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use crate::application::ports::{CommandRunner, StdinMode};
use crate::domain::error::CmdError;

/// Spawn attempts when the freshly installed file is still open for writing
/// in another process (`ETXTBSY`).
const BUSY_RETRIES: u32 = 5;
const BUSY_BACKOFF: Duration = Duration::from_millis(50);

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run_status(
        &self,
        program: &Path,
        args: &[String],
        stdin: StdinMode,
    ) -> Result<ExitStatus, CmdError> {
        let execution_error = |source| CmdError::Execution {
            program: program.display().to_string(),
            source,
        };

        let mut attempt = 0;
        let mut child = loop {
            let spawned = tokio::process::Command::new(program)
                .args(args)
                .stdin(match stdin {
                    StdinMode::Inherit => Stdio::inherit(),
                    StdinMode::Null => Stdio::null(),
                })
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .kill_on_drop(true)
                .spawn();
            match spawned {
                Ok(child) => break child,
                Err(e)
                    if e.kind() == std::io::ErrorKind::ExecutableFileBusy
                        && attempt < BUSY_RETRIES =>
                {
                    attempt += 1;
                    tracing::debug!(program = %program.display(), attempt, "executable busy, retrying spawn");
                    tokio::time::sleep(BUSY_BACKOFF).await;
                }
                Err(e) => return Err(execution_error(e)),
            }
        };

        child.wait().await.map_err(execution_error)
    }
}
