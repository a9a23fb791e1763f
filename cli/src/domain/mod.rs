//! Domain layer: pure types, grammar and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cache;
pub mod config;
pub mod error;
pub mod reference;

pub use config::CmdConfig;
pub use error::{CmdError, ConfigError, Service, TransportError};
pub use reference::{CommandReference, scan_args};
