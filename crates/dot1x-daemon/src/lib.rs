//! Background service hosting an 802.1X authenticator or supplicant.
//!
//! This crate provides a daemon that runs either role outside of any
//! particular CLI invocation:
//!
//! - **Configuration**: a single TOML file selects the role and its
//!   per-port or per-instance settings.
//! - **IPC**: a local socket lets a CLI client query status, list and
//!   inspect ports, push management-surface changes, and stop the
//!   daemon.
//! - **Cross-platform**: Unix domain socket or Windows named pipe via
//!   `interprocess`; PID file and signal-based liveness check on Unix,
//!   service installation on macOS/Linux/Windows.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod ipc;
pub mod service;

pub use config::{DaemonConfig, RoleConfig};
pub use error::{DaemonError, Result};
pub use ipc::{IpcClient, IpcRequest, IpcResponse, IpcServer};
pub use service::{DaemonService, RoleContext, ServiceState};
