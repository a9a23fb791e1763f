// lib/crates/sd-cmd-common/src/spec.rs

use serde::{Deserialize, Serialize};

/// A command spec, either as written in `sd-command.yaml` or as resolved by
/// the Screwdriver API.
///
/// Once resolved, `version` is always a concrete version: ranges and tags are
/// expanded server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maintainer: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(flatten)]
    pub format: Format,
}

impl CommandSpec {
    /// `namespace/name`, without a version.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Execution format of a command, with its format-specific fields.
///
/// On the wire the variant is selected by the `format` key and the fields
/// live under a key of the same name, e.g.
/// `{"format": "binary", "binary": {"file": "./sd-step"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum Format {
    Binary { binary: BinaryFormat },
    Habitat { habitat: HabitatFormat },
    Docker { docker: DockerFormat },
}

impl Format {
    /// Wire name of the format.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Format::Binary { .. } => "binary",
            Format::Habitat { .. } => "habitat",
            Format::Docker { .. } => "docker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryFormat {
    /// Path of the executable, relative to the manifest or absolute.
    pub file: String,
}

/// Where a habitat package comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitatMode {
    /// Package archive is uploaded to and served by the Store.
    Local,
    /// Package is installed from a habitat depot by identifier.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitatFormat {
    pub mode: HabitatMode,
    /// Package identifier, e.g. `core/git/2.14.1`.
    pub package: String,
    /// Package archive (`.hart`), local mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Binary inside the package to run.
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerFormat {
    pub image: String,
    #[serde(default)]
    pub command: String,
}
