//! Store client: implementation of the `ArtifactStore` port.

use sd_cmd_common::{CommandSpec, Format};

use crate::application::ports::{Artifact, ArtifactStore, HttpRequest, HttpTransport, Method};
use crate::domain::error::{CmdError, Service};
use crate::infra::http::{check_status, endpoint, send};

pub struct StoreClient<T> {
    base_url: String,
    token: String,
    transport: T,
}

impl<T: HttpTransport> StoreClient<T> {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            transport,
        }
    }
}

impl<T: HttpTransport> ArtifactStore for StoreClient<T> {
    fn fetch(&self, spec: &CommandSpec) -> Result<Artifact, CmdError> {
        match &spec.format {
            Format::Binary { .. } | Format::Habitat { .. } => {}
            Format::Docker { .. } => {
                return Err(CmdError::UnsupportedFormat(spec.format.name().to_string()));
            }
        }

        let url = endpoint(
            &self.base_url,
            &["commands", &spec.namespace, &spec.name, &spec.version],
        );
        let mut req = HttpRequest::new(Method::Get, url);
        if !self.token.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.token));
        }
        let resp = send(&self.transport, Service::Store, &req)?;
        check_status(Service::Store, &resp)?;

        Ok(Artifact {
            content_type: resp
                .content_type
                .as_deref()
                .map(parse_content_type)
                .unwrap_or_default(),
            body: resp.body,
        })
    }
}

/// MIME type of a `Content-Type` header, without parameters.
///
/// `"text/plain; charset=utf-8"` → `"text/plain"`. Values without a `/` in
/// any `;`-separated part yield the empty string.
#[must_use]
pub fn parse_content_type(header: &str) -> String {
    header
        .split(';')
        .map(str::trim)
        .find(|part| part.contains('/'))
        .unwrap_or_default()
        .to_string()
}
