//! Daemon error types.

use thiserror::Error;

/// Result type for daemon operations.
pub type Result<T> = std::result::Result<T, DaemonError>;

/// Errors that can occur in daemon operations.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// IPC error.
    #[error("IPC error: {message}")]
    Ipc {
        /// Error message.
        message: String,
    },

    /// Service error.
    #[error("service error: {message}")]
    Service {
        /// Error message.
        message: String,
    },

    /// The daemon is already running.
    #[error("daemon is already running (PID: {pid})")]
    AlreadyRunning {
        /// Process ID of the running daemon.
        pid: u32,
    },

    /// The daemon is not running.
    #[error("daemon is not running")]
    NotRunning,

    /// Platform-specific error.
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

    /// Error from the protocol core (FSMs, management surface).
    #[error("dot1x error: {0}")]
    Dot1x(#[from] dot1x_types::Error),
}

impl DaemonError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an IPC error.
    #[must_use]
    pub fn ipc(message: impl Into<String>) -> Self {
        Self::Ipc {
            message: message.into(),
        }
    }

    /// Creates a service error.
    #[must_use]
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
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
