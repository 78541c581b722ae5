//! IPC (inter-process communication) for the daemon (spec.md §11).
//!
//! Cross-platform socket-based communication between the daemon and
//! CLI clients: Unix domain sockets on Unix, named pipes on Windows, via
//! `interprocess`. Requests/responses are newline-delimited JSON.

use crate::error::{DaemonError, Result};
use crate::service::ServiceState;
use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath, GenericNamespaced, ListenerOptions, ToFsName, ToNsName,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

/// IPC request from client to daemon (spec.md §11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IpcRequest {
    /// Get daemon status.
    Status,
    /// List every port this daemon manages.
    PortList,
    /// Show one port's configuration and live state.
    PortShow {
        /// Port index.
        index: u32,
    },
    /// Set a management-surface field on a port, committing only if
    /// `commit` is true (spec.md §4.10 two-phase commit).
    PortSet {
        /// Port index.
        index: u32,
        /// Field name, matching a `dot1x-authenticator::mgmt` setter.
        field: String,
        /// New value, as its string representation.
        value: String,
        /// Whether to commit the change or only validate it.
        commit: bool,
    },
    /// Get a port's statistics.
    Stats {
        /// Port index.
        index: u32,
    },
    /// Reload configuration from disk.
    Reload,
    /// Stop the daemon.
    Stop,
    /// Ping to check if the daemon is alive.
    Ping,
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IpcResponse {
    /// Success with optional message.
    Ok {
        /// Optional message.
        message: Option<String>,
    },
    /// Error response.
    Error {
        /// Error message.
        message: String,
    },
    /// Status response.
    Status {
        /// Current state.
        state: ServiceState,
        /// Uptime in seconds.
        uptime_secs: u64,
        /// Number of ports managed.
        port_count: usize,
    },
    /// A port's configuration and live state, serialized as JSON.
    PortInfo {
        /// Port index.
        index: u32,
        /// Serialized `Port`/`Supplicant` snapshot.
        data: String,
    },
    /// Every managed port's index and authorization status.
    PortList {
        /// `(index, authorized)` pairs.
        ports: Vec<(u32, bool)>,
    },
    /// A port's statistics, serialized as JSON.
    Stats {
        /// Port index.
        index: u32,
        /// Serialized `PortStats`/`SessionStats`.
        data: String,
    },
    /// Pong response.
    Pong,
}

/// Resolves a socket path to a platform-appropriate `interprocess` name.
fn socket_name(path: &str) -> Result<interprocess::local_socket::Name<'static>> {
    let owned = path.to_string();
    if let Ok(name) = owned.clone().to_ns_name::<GenericNamespaced>() {
        return Ok(name);
    }
    owned
        .to_fs_name::<GenericFilePath>()
        .map_err(|e| DaemonError::ipc(format!("invalid socket path: {e}")))
}

/// IPC server that listens for client connections.
pub struct IpcServer {
    socket_path: String,
    listener: Option<interprocess::local_socket::tokio::Listener>,
}

impl IpcServer {
    /// Creates a new IPC server bound to `socket_path` once [`start`] runs.
    #[must_use]
    pub fn new(socket_path: String) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }

    /// Starts listening for connections.
    pub async fn start(&mut self) -> Result<()> {
        #[cfg(unix)]
        {
            let path = std::path::Path::new(&self.socket_path);
            if path.exists() {
                let _ = std::fs::remove_file(path);
            }
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
        }

        let name = socket_name(&self.socket_path)?;
        let listener = ListenerOptions::new()
            .name(name)
            .create_tokio()
            .map_err(|e| DaemonError::ipc(format!("failed to create listener: {e}")))?;

        tracing::info!(socket = %self.socket_path, "IPC server listening");
        self.listener = Some(listener);
        Ok(())
    }

    /// Accepts a client connection.
    pub async fn accept(&self) -> Result<IpcConnection> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| DaemonError::ipc("server not started"))?;
        let stream = listener
            .accept()
            .await
            .map_err(|e| DaemonError::ipc(format!("accept failed: {e}")))?;
        Ok(IpcConnection::new(stream))
    }

    /// Shuts down the server, removing the socket file on Unix.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.listener.take();
        #[cfg(unix)]
        {
            let _ = std::fs::remove_file(&self.socket_path);
        }
        Ok(())
    }
}

/// An IPC connection to a client.
pub struct IpcConnection {
    reader: BufReader<interprocess::local_socket::tokio::RecvHalf>,
    writer: BufWriter<interprocess::local_socket::tokio::SendHalf>,
}

impl IpcConnection {
    fn new(stream: Stream) -> Self {
        let (recv, send) = stream.split();
        Self {
            reader: BufReader::new(recv),
            writer: BufWriter::new(send),
        }
    }

    /// Reads a request from the client, or `None` on a clean disconnect.
    pub async fn read_request(&mut self) -> Result<Option<IpcRequest>> {
        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => Ok(None),
            Ok(_) => {
                let request = serde_json::from_str(line.trim())
                    .map_err(|e| DaemonError::ipc(format!("invalid request: {e}")))?;
                Ok(Some(request))
            }
            Err(e) => Err(DaemonError::Io(e)),
        }
    }

    /// Sends a response to the client.
    pub async fn send_response(&mut self, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_string(response)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// IPC client for connecting to the daemon.
pub struct IpcClient {
    socket_path: String,
    connection: Option<IpcConnection>,
}

impl IpcClient {
    /// Creates a new IPC client.
    #[must_use]
    pub fn new(socket_path: String) -> Self {
        Self {
            socket_path,
            connection: None,
        }
    }

    /// Connects to the daemon.
    pub async fn connect(&mut self) -> Result<()> {
        let name = socket_name(&self.socket_path)?;
        let stream = Stream::connect(name)
            .await
            .map_err(|e| DaemonError::ipc(format!("connection failed: {e}")))?;
        self.connection = Some(IpcConnection::new(stream));
        Ok(())
    }

    /// Sends a request and waits for the response.
    pub async fn request(&mut self, request: &IpcRequest) -> Result<IpcResponse> {
        let conn = self
            .connection
            .as_mut()
            .ok_or_else(|| DaemonError::ipc("not connected"))?;

        let json = serde_json::to_string(request)?;
        conn.writer.write_all(json.as_bytes()).await?;
        conn.writer.write_all(b"\n").await?;
        conn.writer.flush().await?;

        let mut line = String::new();
        conn.reader.read_line(&mut line).await?;
        let response = serde_json::from_str(line.trim())
            .map_err(|e| DaemonError::ipc(format!("invalid response: {e}")))?;
        Ok(response)
    }

    /// Checks whether the daemon at this socket is reachable and alive.
    pub async fn is_daemon_running(&mut self) -> bool {
        if self.connect().await.is_err() {
            return false;
        }
        matches!(self.request(&IpcRequest::Ping).await, Ok(IpcResponse::Pong))
    }
}
