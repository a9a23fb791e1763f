//! Command implementations

pub mod exec;
pub mod promote;
pub mod publish;
pub mod remove_tag;
pub mod validate;
pub mod version;
