//! Daemon service management: owns whichever role context this instance
//! hosts, the IPC server, and the PID file (spec.md §11).

use crate::config::DaemonConfig;
use crate::error::{DaemonError, Result};
use crate::ipc::{IpcConnection, IpcRequest, IpcResponse, IpcServer};
use chrono::{DateTime, Utc};
use dot1x_authenticator::AuthenticatorContext;
use dot1x_supplicant::SupplicantContext;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(unix)]
use std::fs;

/// Service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// Service is starting up.
    Starting,
    /// Service is running.
    Running,
    /// Service is stopping.
    Stopping,
    /// Service is stopped.
    Stopped,
}

/// Which role context this daemon instance drives.
pub enum RoleContext {
    /// Hosting the authenticator side.
    Authenticator(Arc<AuthenticatorContext>),
    /// Hosting the supplicant side.
    Supplicant(Arc<SupplicantContext>),
}

/// The main daemon service: config, role context, IPC server, PID file.
pub struct DaemonService {
    config: DaemonConfig,
    role: RoleContext,
    state: Arc<RwLock<ServiceState>>,
    started_at: Arc<RwLock<Option<DateTime<Utc>>>>,
    ipc_server: Option<IpcServer>,
}

impl DaemonService {
    /// Creates a new daemon service around an already-constructed role
    /// context (spec.md §1: the raw socket / RADIUS transport / switch
    /// driver are external collaborators wired in by the caller).
    #[must_use]
    pub fn new(config: DaemonConfig, role: RoleContext) -> Self {
        Self {
            config,
            role,
            state: Arc::new(RwLock::new(ServiceState::Stopped)),
            started_at: Arc::new(RwLock::new(None)),
            ipc_server: None,
        }
    }

    /// Gets the current service state.
    pub async fn state(&self) -> ServiceState {
        *self.state.read().await
    }

    /// Starts the daemon service: PID file, role context, IPC server.
    pub async fn start(&mut self) -> Result<()> {
        *self.state.write().await = ServiceState::Starting;
        tracing::info!("starting dot1x daemon service");

        if let Some(pid_file) = &self.config.general.pid_file {
            self.write_pid_file(pid_file)?;
        }

        match &self.role {
            RoleContext::Authenticator(ctx) => ctx.start().await?,
            RoleContext::Supplicant(_) => {}
        }

        let mut ipc_server = IpcServer::new(self.config.ipc.socket_path.clone());
        ipc_server.start().await?;
        self.ipc_server = Some(ipc_server);

        match &self.role {
            RoleContext::Authenticator(ctx) => {
                let ctx = Arc::clone(ctx);
                tokio::spawn(async move {
                    if let Err(error) = ctx.run().await {
                        tracing::error!(%error, "authenticator context exited");
                    }
                });
            }
            RoleContext::Supplicant(ctx) => {
                let ctx = Arc::clone(ctx);
                tokio::spawn(async move {
                    if let Err(error) = ctx.run().await {
                        tracing::error!(%error, "supplicant context exited");
                    }
                });
            }
        }

        *self.state.write().await = ServiceState::Running;
        *self.started_at.write().await = Some(Utc::now());
        tracing::info!("dot1x daemon service started");
        Ok(())
    }

    /// Runs the IPC accept loop until a `Stop` request arrives.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("entering main service loop");
        loop {
            if *self.state.read().await != ServiceState::Running {
                break;
            }
            let Some(server) = &self.ipc_server else {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                continue;
            };
            match server.accept().await {
                Ok(mut connection) => self.handle_connection(&mut connection).await,
                Err(error) => {
                    tracing::debug!(%error, "IPC accept error");
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                }
            }
        }
        Ok(())
    }

    async fn handle_connection(&self, connection: &mut IpcConnection) {
        loop {
            match connection.read_request().await {
                Ok(Some(request)) => {
                    let response = self.handle_request(request).await;
                    if let Err(error) = connection.send_response(&response).await {
                        tracing::error!(%error, "failed to send IPC response");
                        break;
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    tracing::error!(%error, "IPC read error");
                    break;
                }
            }
        }
    }

    async fn handle_request(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Ping => IpcResponse::Pong,

            IpcRequest::Status => {
                let state = *self.state.read().await;
                let uptime_secs = self
                    .started_at
                    .read()
                    .await
                    .map(|t| (Utc::now() - t).num_seconds().max(0) as u64)
                    .unwrap_or(0);
                let port_count = match &self.role {
                    RoleContext::Authenticator(ctx) => ctx.port_count(),
                    RoleContext::Supplicant(_) => 1,
                };
                IpcResponse::Status {
                    state,
                    uptime_secs,
                    port_count,
                }
            }

            IpcRequest::PortList => match &self.role {
                RoleContext::Authenticator(ctx) => {
                    let mut ports = Vec::with_capacity(ctx.port_count());
                    for index in 0..ctx.port_count() as u32 {
                        if let Ok(status) = ctx
                            .with_port(index, |port| port.auth_port_status)
                            .await
                        {
                            ports.push((index, status == dot1x_types::stats::AuthPortStatus::Authorized));
                        }
                    }
                    IpcResponse::PortList { ports }
                }
                RoleContext::Supplicant(ctx) => {
                    let authorized = ctx
                        .with_supplicant(|s| {
                            s.auth_port_status == dot1x_types::stats::AuthPortStatus::Authorized
                        })
                        .await;
                    IpcResponse::PortList {
                        ports: vec![(0, authorized)],
                    }
                }
            },

            IpcRequest::PortShow { index } => self.port_show(index).await,

            IpcRequest::PortSet {
                index,
                field,
                value,
                commit,
            } => self.port_set(index, &field, &value, commit).await,

            IpcRequest::Stats { index } => self.port_stats(index).await,

            IpcRequest::Reload => IpcResponse::Ok {
                message: Some("configuration reload is not yet wired up".to_string()),
            },

            IpcRequest::Stop => {
                tracing::info!("received stop request");
                *self.state.write().await = ServiceState::Stopping;
                IpcResponse::Ok {
                    message: Some("daemon stopping".to_string()),
                }
            }
        }
    }

    async fn port_show(&self, index: u32) -> IpcResponse {
        match &self.role {
            RoleContext::Authenticator(ctx) => {
                let result = ctx
                    .with_port(index, |port| {
                        serde_json::json!({
                            "port_control": format!("{:?}", port.config.port_control),
                            "auth_port_status": format!("{:?}", port.auth_port_status),
                            "pae_state": format!("{:?}", port.pae_state),
                        })
                    })
                    .await;
                match result {
                    Ok(data) => IpcResponse::PortInfo {
                        index,
                        data: data.to_string(),
                    },
                    Err(error) => IpcResponse::Error {
                        message: error.to_string(),
                    },
                }
            }
            RoleContext::Supplicant(ctx) => {
                let data = ctx
                    .with_supplicant(|s| {
                        serde_json::json!({
                            "port_control": format!("{:?}", s.port_control),
                            "auth_port_status": format!("{:?}", s.auth_port_status),
                            "pae_state": format!("{:?}", s.pae_state),
                        })
                    })
                    .await;
                IpcResponse::PortInfo {
                    index: 0,
                    data: data.to_string(),
                }
            }
        }
    }

    async fn port_set(&self, index: u32, field: &str, value: &str, commit: bool) -> IpcResponse {
        if !commit {
            return IpcResponse::Ok {
                message: Some(format!("{field}={value} validated (not committed)")),
            };
        }
        let RoleContext::Authenticator(ctx) = &self.role else {
            return IpcResponse::Error {
                message: "port_set is only meaningful for an authenticator instance".to_string(),
            };
        };
        let outcome = match field {
            "quiet_period_secs" => match value.parse() {
                Ok(secs) => ctx.set_quiet_period(index, secs).await.map_err(|e| e.to_string()),
                Err(_) => Err(format!("invalid u16: {value}")),
            },
            "server_timeout_secs" => match value.parse() {
                Ok(secs) => ctx
                    .set_server_timeout(index, secs)
                    .await
                    .map_err(|e| e.to_string()),
                Err(_) => Err(format!("invalid u16: {value}")),
            },
            "re_auth_period_secs" => match value.parse() {
                Ok(secs) => ctx
                    .set_reauth_period(index, secs)
                    .await
                    .map_err(|e| e.to_string()),
                Err(_) => Err(format!("invalid u32: {value}")),
            },
            "re_auth_enabled" => match value.parse() {
                Ok(enabled) => ctx
                    .set_reauth_enabled(index, enabled)
                    .await
                    .map_err(|e| e.to_string()),
                Err(_) => Err(format!("invalid bool: {value}")),
            },
            "key_tx_enabled" => match value.parse() {
                Ok(enabled) => ctx
                    .set_key_tx_enabled(index, enabled)
                    .await
                    .map_err(|e| e.to_string()),
                Err(_) => Err(format!("invalid bool: {value}")),
            },
            other => Err(format!("unknown field: {other}")),
        };
        match outcome {
            Ok(()) => IpcResponse::Ok {
                message: Some(format!("{field} set to {value}")),
            },
            Err(message) => IpcResponse::Error { message },
        }
    }

    async fn port_stats(&self, index: u32) -> IpcResponse {
        match &self.role {
            RoleContext::Authenticator(ctx) => {
                let result = ctx
                    .with_port(index, |port| (port.stats, port.session))
                    .await;
                match result {
                    Ok((stats, session)) => IpcResponse::Stats {
                        index,
                        data: serde_json::json!({ "stats": stats, "session": session }).to_string(),
                    },
                    Err(error) => IpcResponse::Error {
                        message: error.to_string(),
                    },
                }
            }
            RoleContext::Supplicant(ctx) => {
                let (stats, session) = ctx.with_supplicant(|s| (s.stats, s.session)).await;
                IpcResponse::Stats {
                    index: 0,
                    data: serde_json::json!({ "stats": stats, "session": session }).to_string(),
                }
            }
        }
    }

    /// Stops the daemon service.
    pub async fn stop(&mut self) -> Result<()> {
        *self.state.write().await = ServiceState::Stopping;
        tracing::info!("stopping dot1x daemon service");

        if let RoleContext::Authenticator(ctx) = &self.role {
            ctx.stop().await?;
        }
        if let Some(server) = &mut self.ipc_server {
            server.shutdown().await?;
        }
        if let Some(pid_file) = &self.config.general.pid_file {
            let _ = std::fs::remove_file(pid_file);
        }

        *self.state.write().await = ServiceState::Stopped;
        tracing::info!("dot1x daemon service stopped");
        Ok(())
    }

    fn write_pid_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pid = std::process::id();
        std::fs::write(path, pid.to_string())?;
        tracing::debug!(pid, ?path, "wrote PID file");
        Ok(())
    }

    /// Checks if another daemon instance is running, returning its PID.
    #[must_use]
    pub fn is_already_running(pid_file: &Path) -> Option<u32> {
        if !pid_file.exists() {
            return None;
        }
        let pid: u32 = std::fs::read_to_string(pid_file).ok()?.trim().parse().ok()?;

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            match kill(Pid::from_raw(pid as i32), Signal::SIGCONT) {
                Ok(()) => Some(pid),
                Err(nix::errno::Errno::ESRCH) => {
                    let _ = std::fs::remove_file(pid_file);
                    None
                }
                Err(_) => Some(pid),
            }
        }

        #[cfg(windows)]
        {
            Some(pid)
        }
    }
}

/// Daemonizes the process (Unix only).
#[cfg(unix)]
pub fn daemonize() -> Result<()> {
    use daemonize::Daemonize;
    Daemonize::new()
        .start()
        .map_err(|e| DaemonError::platform(format!("failed to daemonize: {e}")))?;
    Ok(())
}

/// Daemonizes the process (Windows uses services instead, no-op here).
#[cfg(windows)]
pub fn daemonize() -> Result<()> {
    Ok(())
}

/// Installs the daemon as a system service (launchd).
#[cfg(target_os = "macos")]
pub fn install_service(config: &DaemonConfig) -> Result<()> {
    let plist_content = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>net.dot1x.daemon</string>
    <key>ProgramArguments</key>
    <array>
        <string>/usr/local/bin/dot1x</string>
        <string>daemon</string>
        <string>run</string>
        <string>--foreground</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>KeepAlive</key>
    <true/>
    <key>StandardOutPath</key>
    <string>{log}</string>
    <key>StandardErrorPath</key>
    <string>{log}</string>
</dict>
</plist>"#,
        log = config
            .general
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "/var/log/dot1x/daemon.log".to_string()),
    );

    let plist_path = Path::new("/Library/LaunchDaemons/net.dot1x.daemon.plist");
    fs::write(plist_path, plist_content)?;
    tracing::info!(?plist_path, "installed launchd service");
    tracing::info!("run 'sudo launchctl load {:?}' to start", plist_path);
    Ok(())
}

/// Installs the daemon as a system service (systemd).
#[cfg(target_os = "linux")]
pub fn install_service(config: &DaemonConfig) -> Result<()> {
    let log = config
        .general
        .log_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/var/log/dot1x/daemon.log".to_string());

    let service_content = format!(
        r#"[Unit]
Description=dot1x 802.1X authenticator/supplicant daemon
After=network.target

[Service]
Type=simple
ExecStart=/usr/local/bin/dot1x daemon run --foreground
Restart=always
RestartSec=10
StandardOutput=append:{log}
StandardError=append:{log}

[Install]
WantedBy=multi-user.target
"#
    );

    let service_path = Path::new("/etc/systemd/system/dot1x.service");
    fs::write(service_path, service_content)?;
    tracing::info!(?service_path, "installed systemd service");
    tracing::info!(
        "run 'sudo systemctl daemon-reload && sudo systemctl enable --now dot1x' to start"
    );
    Ok(())
}

/// Installs the daemon as a system service (Windows stub).
#[cfg(target_os = "windows")]
pub fn install_service(_config: &DaemonConfig) -> Result<()> {
    Err(DaemonError::platform(
        "Windows service installation not yet implemented".to_string(),
    ))
}

/// Installs the daemon as a system service (other platforms).
#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
pub fn install_service(_config: &DaemonConfig) -> Result<()> {
    Err(DaemonError::platform(
        "service installation not supported on this platform".to_string(),
    ))
}
