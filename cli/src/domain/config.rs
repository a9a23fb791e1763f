//! Runtime configuration schema.
//!
//! Pure data and validation; loading from the environment lives in
//! `infra::config`.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::domain::error::ConfigError;

pub const DEFAULT_ARTIFACTS_DIR: &str = "/sd/workspace/artifacts";
pub const DEFAULT_BASE_COMMAND_PATH: &str = "/opt/sd/commands";

/// Settings read from `SD_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CmdConfig {
    /// `SD_API_URL`: base URL of the Screwdriver API, e.g. `https://api.example.com/v4/`.
    pub api_url: String,
    /// `SD_STORE_URL`: base URL of the Store.
    pub store_url: String,
    /// `SD_TOKEN`: bearer token sent to both services.
    pub token: String,
    /// `SD_ARTIFACTS_DIR`: build artifacts directory; debug logs go under it.
    pub artifacts_dir: PathBuf,
    /// `SD_BASE_COMMAND_PATH`: root of the local command cache.
    pub base_command_path: PathBuf,
    /// `SD_CMD_DEBUG_LOG`: write a debug log file for every `exec`.
    #[serde(deserialize_with = "deserialize_flag")]
    pub cmd_debug_log: bool,
}

impl Default for CmdConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            store_url: String::new(),
            token: String::new(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            base_command_path: PathBuf::from(DEFAULT_BASE_COMMAND_PATH),
            cmd_debug_log: false,
        }
    }
}

impl CmdConfig {
    /// Trim whitespace and restore defaults for values set to the empty string.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.api_url = self.api_url.trim().to_string();
        self.store_url = self.store_url.trim().to_string();
        self.token = self.token.trim().to_string();
        self.artifacts_dir = normalize_dir(&self.artifacts_dir, DEFAULT_ARTIFACTS_DIR);
        self.base_command_path = normalize_dir(&self.base_command_path, DEFAULT_BASE_COMMAND_PATH);
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `SD_API_URL` is unset or empty.
    pub fn require_api_url(&self) -> Result<&str, ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::Missing("SD_API_URL"));
        }
        Ok(&self.api_url)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `SD_STORE_URL` is unset or empty.
    pub fn require_store_url(&self) -> Result<&str, ConfigError> {
        if self.store_url.is_empty() {
            return Err(ConfigError::Missing("SD_STORE_URL"));
        }
        Ok(&self.store_url)
    }
}

fn normalize_dir(dir: &std::path::Path, default: &str) -> PathBuf {
    let raw = dir.to_string_lossy();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PathBuf::from(default);
    }
    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(stripped)
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_flag(&raw))
}

/// `true`, `1`, `yes` and `on` (any case) enable a flag; anything else disables it.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
