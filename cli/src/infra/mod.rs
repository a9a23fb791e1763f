//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP, the local command
//! cache, process execution, environment configuration and logging.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod api;
pub mod cache;
pub mod command_runner;
pub mod config;
pub mod http;
pub mod logging;
pub mod manifest;
pub mod multipart;
pub mod store;
