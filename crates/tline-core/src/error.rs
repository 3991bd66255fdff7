//! Error types for the status line engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring or painting a status line.
#[derive(Error, Debug)]
pub enum Error {
    /// The terminal stream failed. Treated as fatal by callers.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A column or status line was built with values it cannot render.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A column could not be placed on the line.
    #[error("layout error: {0}")]
    Layout(String),

    /// The status line was already disposed.
    #[error("status line has been disposed")]
    Disposed,

    /// A configuration file could not be parsed.
    #[error("failed to parse config {path}: {source}")]
    Config {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidConfiguration`].
    pub fn invalid(msg: impl std::fmt::Display) -> Self {
        Self::InvalidConfiguration(msg.to_string())
    }

    /// Shorthand for [`Error::Layout`].
    pub fn layout(msg: impl std::fmt::Display) -> Self {
        Self::Layout(msg.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
