//! `tracing` subscriber bootstrap.
//!
//! Diagnostics go to stderr and, for `exec` with file logging enabled, to a
//! per-invocation file under the artifacts directory. Never to stdout.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::domain::reference::CommandReference;

/// Which sinks to install.
#[derive(Debug, Default)]
pub struct LogSettings {
    /// Raise the stderr level from `warn` to `debug`.
    pub debug: bool,
    /// Also log at `debug` level to this file.
    pub log_file: Option<PathBuf>,
}

/// `{artifacts}/.sd/commands/{namespace}/{name}/{versionSpec}/{unix_secs}.log`
#[must_use]
pub fn log_file_path(artifacts_dir: &Path, reference: &CommandReference, unix_secs: i64) -> PathBuf {
    artifacts_dir
        .join(".sd")
        .join("commands")
        .join(&reference.namespace)
        .join(&reference.name)
        .join(&reference.version_spec)
        .join(format!("{unix_secs}.log"))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Calling it twice is a no-op.
///
/// A log file that cannot be opened is reported as a warning once the
/// stderr sink is up; it never fails the command.
pub fn init(settings: &LogSettings) {
    let default_level = if settings.debug { "debug" } else { "warn" };
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let mut open_failure = None;
    let file_layer = settings.log_file.as_deref().and_then(|path| match open_log_file(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        ),
        Err(e) => {
            open_failure = Some((path.to_path_buf(), e));
            None
        }
    });

    if tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return;
    }

    if let Some((path, error)) = open_failure {
        tracing::warn!(path = %path.display(), %error, "cannot open log file, continuing without it");
    } else if let Some(path) = &settings.log_file {
        tracing::debug!(path = %path.display(), "logging to file");
    }
}
