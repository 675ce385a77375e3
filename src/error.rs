//! Error types for gres.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using gres's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gres operations.
#[derive(Error, Debug)]
pub enum Error {
    // Payload errors
    /// Pack, extract or strip failed.
    #[error(transparent)]
    Pack(#[from] gres_pack::PackError),

    /// Resource directory does not exist.
    #[error("resource directory not found: {}", path.display())]
    RootNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    // Configuration errors
    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to load configuration.
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Failed to save configuration.
    #[error("failed to save config: {0}")]
    ConfigSave(String),

    // IO errors
    /// IO error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
