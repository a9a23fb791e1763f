//! HTTP plumbing shared by the API and Store clients.
//!
//! `UreqTransport` puts requests on the wire, `RetryingTransport` wraps any
//! transport with bounded exponential backoff, and `check_status`/`decode`
//! apply the status-code mapping every client call shares.

use std::io::Read;
use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;

use sd_cmd_common::ApiErrorBody;

use crate::application::ports::{HttpRequest, HttpResponse, HttpTransport};
use crate::domain::error::{CmdError, Service, TransportError};

/// Per-request timeout for both services.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Upper bound on a response body (artifacts included).
const MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

/// Characters escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Join `segments` onto `base`, percent-encoding each one.
///
/// Trailing slashes on `base` are tolerated.
#[must_use]
pub fn endpoint(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
    }
    url
}

// ── ureq transport ────────────────────────────────────────────────────────────

/// Blocking transport backed by a `ureq` agent.
///
/// A body larger than the configured limit, or shorter than its
/// `Content-Length`, is an error rather than a short `Ok`.
pub struct UreqTransport {
    agent: ureq::Agent,
    max_body_bytes: u64,
}

impl UreqTransport {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(REQUEST_TIMEOUT)
    }
}

impl HttpTransport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut call = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }
        let result = match &request.body {
            Some(body) => call.send_bytes(body),
            None => call.call(),
        };
        let response = match result {
            Ok(r) | Err(ureq::Error::Status(_, r)) => r,
            Err(ureq::Error::Transport(t)) => return Err(classify_transport(&t)),
        };

        let status = response.status();
        let content_type = response.header("Content-Type").map(str::to_string);
        let declared_length = response
            .header("Content-Length")
            .and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(length) = declared_length.filter(|&n| n > self.max_body_bytes) {
            return Err(body_too_large(length, self.max_body_bytes));
        }

        let mut body = Vec::new();
        response
            .into_reader()
            .take(self.max_body_bytes.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| TransportError::Fatal(format!("failed to read response body: {e}")))?;
        let received = body.len() as u64;
        if received > self.max_body_bytes {
            return Err(body_too_large(received, self.max_body_bytes));
        }
        if let Some(length) = declared_length.filter(|&n| n != received) {
            return Err(TransportError::Fatal(format!(
                "response body truncated: received {received} of {length} bytes"
            )));
        }
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn body_too_large(length: u64, limit: u64) -> TransportError {
    TransportError::Fatal(format!(
        "response body of {length} bytes exceeds the {limit} byte limit"
    ))
}

fn classify_transport(t: &ureq::Transport) -> TransportError {
    use ureq::ErrorKind;
    match t.kind() {
        ErrorKind::Dns | ErrorKind::ConnectionFailed | ErrorKind::Io | ErrorKind::ProxyConnect => {
            TransportError::Retryable(t.to_string())
        }
        _ => TransportError::Fatal(t.to_string()),
    }
}

// ── Retry decorator ───────────────────────────────────────────────────────────

/// Exponential backoff schedule for transport-level failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based), capped at `max_delay`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !delay.is_finite() || delay >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(delay)
    }
}

/// Retries retryable transport failures of the inner transport.
///
/// Completed responses, whatever their status, and fatal transport errors
/// are returned at once.
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T: HttpTransport> HttpTransport for RetryingTransport<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match self.inner.send(request) {
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    let delay = self.policy.delay_for_attempt(attempt);
                    tracing::debug!(
                        method = request.method.as_str(),
                        url = %request.url,
                        attempt = attempt + 1,
                        ?delay,
                        error = %e,
                        "request failed, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

// ── Status mapping ────────────────────────────────────────────────────────────

/// Map a completed response to `Ok` (2xx) or the categorized failure.
///
/// # Errors
///
/// 4xx → `Metadata` (or `UnparseableResponse` when the error body does not
/// decode), 5xx → `Server`, anything else → `UnknownTransportOutcome`.
pub fn check_status(service: Service, response: &HttpResponse) -> Result<(), CmdError> {
    let status = response.status;
    match status {
        200..=299 => Ok(()),
        400..=499 => {
            let body: ApiErrorBody = serde_json::from_slice(&response.body).map_err(|e| {
                CmdError::UnparseableResponse {
                    service,
                    status,
                    detail: e.to_string(),
                }
            })?;
            Err(CmdError::Metadata {
                service,
                status,
                reason: body.reason,
                message: body.message,
            })
        }
        500..=599 => Err(CmdError::Server { service, status }),
        _ => Err(CmdError::UnknownTransportOutcome { service, status }),
    }
}

/// `check_status`, then decode the 2xx body as JSON.
///
/// # Errors
///
/// Everything `check_status` returns, plus `UnparseableResponse` when the
/// body does not match `T`.
pub fn decode<T: DeserializeOwned>(service: Service, response: &HttpResponse) -> Result<T, CmdError> {
    check_status(service, response)?;
    serde_json::from_slice(&response.body).map_err(|e| CmdError::UnparseableResponse {
        service,
        status: response.status,
        detail: e.to_string(),
    })
}

/// Send through `transport`, mapping transport failures to `CmdError::Network`.
///
/// # Errors
///
/// Returns `Network` when no response was received.
pub fn send(
    transport: &impl HttpTransport,
    service: Service,
    request: &HttpRequest,
) -> Result<HttpResponse, CmdError> {
    tracing::debug!(
        method = request.method.as_str(),
        url = %request.url,
        %service,
        "sending request"
    );
    let response = transport
        .send(request)
        .map_err(|source| CmdError::Network { service, source })?;
    tracing::debug!(status = response.status, url = %request.url, "response received");
    Ok(response)
}
