//! CLI command implementations.

pub mod config;
pub mod extract;
pub mod list;
pub mod pack;
pub mod strip;
