//! Loads `CmdConfig` from `SD_*` environment variables via `envy`.

use crate::domain::config::CmdConfig;
use crate::domain::error::ConfigError;

const PREFIX: &str = "SD_";

/// Read the configuration from the process environment.
///
/// # Errors
///
/// Returns `ConfigError::Env` if a variable holds a value of the wrong shape.
pub fn load_from_env() -> Result<CmdConfig, ConfigError> {
    from_vars(std::env::vars())
}

/// Read the configuration from explicit `(name, value)` pairs.
///
/// # Errors
///
/// Returns `ConfigError::Env` if a variable holds a value of the wrong shape.
pub fn from_vars<I>(vars: I) -> Result<CmdConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let config: CmdConfig = envy::prefixed(PREFIX)
        .from_iter(vars)
        .map_err(|e| ConfigError::Env(e.to_string()))?;
    Ok(config.normalized())
}
