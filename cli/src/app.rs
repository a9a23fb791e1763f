//! Application context: unified state passed to every command handler.
//!
//! `AppContext` holds the configuration loaded once at startup and builds
//! the infrastructure clients from it. No command reads the environment.

use crate::domain::config::CmdConfig;
use crate::domain::error::ConfigError;
use crate::infra::api::ScrewdriverApi;
use crate::infra::cache::LocalCache;
use crate::infra::http::{RetryPolicy, RetryingTransport, UreqTransport};
use crate::infra::store::StoreClient;
use crate::output::OutputContext;

/// Transport used for both remote services.
pub type Transport = RetryingTransport<UreqTransport>;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// `SD_*` settings.
    pub config: CmdConfig,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &OutputFlags, config: CmdConfig) -> Self {
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            config,
        }
    }

    /// Screwdriver API client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `SD_API_URL` is not set.
    pub fn api(&self) -> Result<ScrewdriverApi<Transport>, ConfigError> {
        Ok(ScrewdriverApi::new(
            self.config.require_api_url()?,
            self.config.token.clone(),
            transport(),
        ))
    }

    /// Store client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `SD_STORE_URL` is not set.
    pub fn store(&self) -> Result<StoreClient<Transport>, ConfigError> {
        Ok(StoreClient::new(
            self.config.require_store_url()?,
            self.config.token.clone(),
            transport(),
        ))
    }

    /// Local command cache rooted at `SD_BASE_COMMAND_PATH`.
    #[must_use]
    pub fn cache(&self) -> LocalCache {
        LocalCache::new(&self.config.base_command_path)
    }
}

fn transport() -> Transport {
    RetryingTransport::new(UreqTransport::default(), RetryPolicy::default())
}
