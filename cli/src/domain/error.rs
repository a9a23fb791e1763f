//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs` or `std::process`.
//! Every variant maps to one failure category a caller may want to match on;
//! command handlers convert them to `anyhow::Error` via the `?` operator.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ── Remote services ───────────────────────────────────────────────────────────

/// The remote service a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Screwdriver API (command metadata, tags, validator).
    Api,
    /// Screwdriver Store (command artifacts).
    Store,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Api => f.write_str("Screwdriver API"),
            Service::Store => f.write_str("Store API"),
        }
    }
}

// ── Transport errors ──────────────────────────────────────────────────────────

/// A request that never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout and the like.
    #[error("{0}")]
    Retryable(String),

    /// Malformed URL, unsupported scheme, unreadable body.
    #[error("{0}")]
    Fatal(String),
}

impl TransportError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Retryable(_))
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to loading `SD_*` configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("cannot load configuration from SD_* environment variables: {0}")]
    Env(String),
}

// ── Command errors ────────────────────────────────────────────────────────────

/// Every failure the resolve → fetch → install → execute pipeline and the
/// tag/publish workflows can report.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error("'{0}' is not a command reference (expected namespace/name@version)")]
    MalformedReference(String),

    #[error("'{version}' in '{reference}' is not a valid version, range or tag")]
    InvalidVersionSpec { reference: String, version: String },

    #[error("no command reference (namespace/name@version) found in arguments")]
    NoReferenceFound,

    #[error("'{0}' is not a valid command name (expected namespace/name)")]
    InvalidCommandName(String),

    #[error("'{0}' is not a valid tag name")]
    InvalidTagName(String),

    /// A 4xx response with a decodable error body.
    #[error("{service} {status} {reason}: {message}")]
    Metadata {
        service: Service,
        status: u16,
        reason: String,
        message: String,
    },

    #[error("{service} has internal server error: status={status}")]
    Server { service: Service, status: u16 },

    #[error("unknown error while communicating with {service}: status={status}")]
    UnknownTransportOutcome { service: Service, status: u16 },

    #[error("{service} response unparseable: status={status}: {detail}")]
    UnparseableResponse {
        service: Service,
        status: u16,
        detail: String,
    },

    #[error("request to {service} failed: {source}")]
    Network {
        service: Service,
        #[source]
        source: TransportError,
    },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("resolved command spec cannot be installed: {0}")]
    InvalidSpec(String),

    #[error("failed to {action} {}: {source}", .path.display())]
    Install {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read artifact {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to execute {program}: {source}")]
    Execution {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command is not valid for the following reasons:\n{}", .0.join("\n"))]
    ValidationFailed(Vec<String>),

    #[error("cannot load manifest {}: {detail}", .path.display())]
    Manifest { path: PathBuf, detail: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CmdError {
    /// `true` when the remote service answered 404 for the requested object.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmdError::Metadata { status: 404, .. })
    }
}
