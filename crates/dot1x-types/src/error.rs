//! Error types for dot1x.

use thiserror::Error;

/// Result type alias using the dot1x `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dot1x operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error: an out-of-range or otherwise invalid parameter.
    #[error("configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// Invalid port index passed to the management surface.
    #[error("invalid port index: {index}")]
    InvalidPort {
        /// The offending index.
        index: u32,
    },

    /// A resource (socket, mutex, background task) could not be acquired.
    #[error("resource acquisition failed: {message}")]
    ResourceUnavailable {
        /// Error message.
        message: String,
    },

    /// Platform/driver error (switch port state, PAE filter install).
    #[error("platform error: {message}")]
    Platform {
        /// Error message.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a resource-unavailable error.
    #[must_use]
    pub fn resource(message: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            message: message.into(),
        }
    }

    /// Creates a platform error.
    #[must_use]
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }
}
