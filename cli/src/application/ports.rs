//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared wire types,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use sd_cmd_common::{CommandSpec, TagPointer, ValidationResult};

use crate::domain::error::{CmdError, TransportError};
use crate::domain::reference::CommandReference;

// ── HTTP Transport Port ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully built request; the transport adds nothing but the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a body together with its `Content-Type`.
    #[must_use]
    pub fn body(self, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mut req = self.header("Content-Type", content_type);
        req.body = Some(bytes);
        req
    }

    /// First header named `name`, case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed HTTP exchange, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Sends one request. Returns `Err` only when no response was received.
pub trait HttpTransport {
    /// # Errors
    ///
    /// `TransportError::Retryable` for connection-level failures that may
    /// succeed on a later attempt, `TransportError::Fatal` otherwise.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

// ── Remote Service Ports ──────────────────────────────────────────────────────

/// The Screwdriver API: command metadata, tags and manifest validation.
pub trait MetadataApi {
    /// Resolve a version, range or tag to a concrete command spec.
    fn resolve(&self, reference: &CommandReference) -> Result<CommandSpec, CmdError>;
    /// Publish a new command version, uploading `artifact` when given.
    fn publish(&self, spec: &CommandSpec, artifact: Option<&Path>)
    -> Result<CommandSpec, CmdError>;
    /// Point `tag` of `namespace/name` at `version`.
    fn tag(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
        tag: &str,
    ) -> Result<TagPointer, CmdError>;
    /// Delete `tag` of `namespace/name`.
    fn remove_tag(&self, namespace: &str, name: &str, tag: &str) -> Result<TagPointer, CmdError>;
    /// Check a manifest. `Ok` even when the manifest is rejected.
    fn validate(&self, manifest_yaml: &str) -> Result<ValidationResult, CmdError>;
}

/// Raw artifact bytes plus the MIME type the Store reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// The Store: artifact bytes of resolved binary and habitat commands.
pub trait ArtifactStore {
    /// # Errors
    ///
    /// `UnsupportedFormat` for any format other than binary and habitat,
    /// without contacting the Store.
    fn fetch(&self, spec: &CommandSpec) -> Result<Artifact, CmdError>;
}

// ── Local Cache Port ──────────────────────────────────────────────────────────

/// Installed artifacts keyed by `(namespace, name, version)`.
pub trait ArtifactCache {
    /// Deterministic location of the artifact of `spec`.
    fn path_for(&self, spec: &CommandSpec) -> Result<PathBuf, CmdError>;
    /// `true` iff a non-empty regular file exists at `path_for(spec)`.
    fn is_installed(&self, spec: &CommandSpec) -> bool;
    /// Atomically materialize `artifact` at `path_for(spec)`.
    fn install(&self, spec: &CommandSpec, artifact: &Artifact) -> Result<PathBuf, CmdError>;
}

// ── Process Port ──────────────────────────────────────────────────────────────

/// What the child process reads as stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    /// Share the parent's stdin.
    Inherit,
    /// Read from `/dev/null`.
    Null,
}

/// Abstracts subprocess execution so the executor can be tested without
/// spawning real processes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` with stdout and stderr inherited and return its exit status.
    ///
    /// # Errors
    ///
    /// Returns `CmdError::Execution` if the process cannot be spawned or waited on.
    async fn run_status(
        &self,
        program: &Path,
        args: &[String],
        stdin: StdinMode,
    ) -> Result<ExitStatus, CmdError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
