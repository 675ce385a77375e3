//! gres - embed resource directories inside executables.
//!
//! The payload format and the pack/extract/strip operations live in the
//! [`gres_pack`] crate. This crate adds configuration, path filters and the
//! error type used by the `gres` command line tool.

pub mod config;
pub mod error;
pub mod filter;

pub use error::{Error, Result};
pub use gres_pack as pack;

/// gres version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
