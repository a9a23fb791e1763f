//! Screwdriver API client: implementation of the `MetadataApi` port.

use std::path::Path;

use sd_cmd_common::{CommandSpec, TagPointer, TagRequest, ValidationResult, ValidatorRequest};

use crate::application::ports::{HttpRequest, HttpTransport, MetadataApi, Method};
use crate::domain::error::{CmdError, Service};
use crate::domain::reference::CommandReference;
use crate::infra::http::{decode, endpoint, send};
use crate::infra::multipart::MultipartForm;

const JSON: &str = "application/json";

pub struct ScrewdriverApi<T> {
    base_url: String,
    token: String,
    transport: T,
}

impl<T: HttpTransport> ScrewdriverApi<T> {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            transport,
        }
    }

    fn request(&self, method: Method, segments: &[&str]) -> HttpRequest {
        let req = HttpRequest::new(method, endpoint(&self.base_url, segments));
        if self.token.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.token))
        }
    }

    fn json_body<B: serde::Serialize>(req: HttpRequest, body: &B) -> Result<HttpRequest, CmdError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| CmdError::InvalidSpec(format!("cannot encode request body: {e}")))?;
        Ok(req.body(JSON, bytes))
    }
}

impl<T: HttpTransport> MetadataApi for ScrewdriverApi<T> {
    fn resolve(&self, reference: &CommandReference) -> Result<CommandSpec, CmdError> {
        let req = self.request(
            Method::Get,
            &[
                "commands",
                &reference.namespace,
                &reference.name,
                &reference.version_spec,
            ],
        );
        let resp = send(&self.transport, Service::Api, &req)?;
        let spec: CommandSpec = decode(Service::Api, &resp)?;
        tracing::debug!(%reference, version = %spec.version, format = spec.format.name(), "resolved command");
        Ok(spec)
    }

    fn publish(&self, spec: &CommandSpec, artifact: Option<&Path>) -> Result<CommandSpec, CmdError> {
        let manifest = serde_json::to_string(spec)
            .map_err(|e| CmdError::InvalidSpec(format!("cannot encode manifest: {e}")))?;
        let mut form = MultipartForm::new().text("spec", &manifest);
        if let Some(path) = artifact {
            let bytes = std::fs::read(path).map_err(|source| CmdError::ArtifactRead {
                path: path.to_path_buf(),
                source,
            })?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            form = form.file("file", &filename, "application/octet-stream", &bytes);
        }
        let (content_type, body) = form.finish();

        let req = self.request(Method::Post, &["commands"]).body(content_type, body);
        let resp = send(&self.transport, Service::Api, &req)?;
        decode(Service::Api, &resp)
    }

    fn tag(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
        tag: &str,
    ) -> Result<TagPointer, CmdError> {
        let req = self.request(Method::Put, &["commands", namespace, name, "tags", tag]);
        let req = Self::json_body(
            req,
            &TagRequest {
                version: version.to_string(),
            },
        )?;
        let resp = send(&self.transport, Service::Api, &req)?;
        decode(Service::Api, &resp)
    }

    fn remove_tag(&self, namespace: &str, name: &str, tag: &str) -> Result<TagPointer, CmdError> {
        let req = self.request(Method::Delete, &["commands", namespace, name, "tags", tag]);
        let resp = send(&self.transport, Service::Api, &req)?;
        decode(Service::Api, &resp)
    }

    fn validate(&self, manifest_yaml: &str) -> Result<ValidationResult, CmdError> {
        let req = self.request(Method::Post, &["validator", "command"]);
        let req = Self::json_body(
            req,
            &ValidatorRequest {
                yaml: manifest_yaml.to_string(),
            },
        )?;
        let resp = send(&self.transport, Service::Api, &req)?;
        decode(Service::Api, &resp)
    }
}
