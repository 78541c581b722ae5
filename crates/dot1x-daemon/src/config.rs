//! Daemon configuration (spec.md §6, §1.3 ambient-stack expansion).

use crate::error::{DaemonError, Result};
use dot1x_types::config::{PortConfig, RadiusServerConfig, SupplicantConfig};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

/// Top-level daemon configuration, loaded from a single TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// General daemon settings.
    pub general: GeneralConfig,
    /// IPC settings.
    pub ipc: IpcConfig,
    /// Which role this daemon instance hosts.
    pub role: RoleConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            ipc: IpcConfig::default(),
            role: RoleConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DaemonError::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        match &self.role {
            RoleConfig::Authenticator(cfg) => {
                for port in &cfg.ports {
                    port.validate()?;
                }
            }
            RoleConfig::Supplicant(cfg) => cfg.config.validate()?,
        }
        Ok(())
    }

    /// Returns the default configuration file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if cfg!(target_os = "macos") {
            PathBuf::from("/Library/Application Support/dot1x/daemon.toml")
        } else if cfg!(target_os = "linux") {
            PathBuf::from("/etc/dot1x/daemon.toml")
        } else if cfg!(target_os = "windows") {
            PathBuf::from(r"C:\ProgramData\dot1x\daemon.toml")
        } else {
            PathBuf::from("daemon.toml")
        }
    }

    /// Returns the user-specific configuration file path.
    #[must_use]
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dot1x").join("daemon.toml"))
    }
}

/// General daemon settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Whether to run in foreground mode (don't daemonize).
    pub foreground: bool,
    /// Log level (`EnvFilter` directive).
    pub log_level: String,
    /// Log file path; `None` logs to stderr only.
    pub log_file: Option<PathBuf>,
    /// PID file path.
    pub pid_file: Option<PathBuf>,
    /// Interface this daemon instance binds to.
    pub interface: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            foreground: false,
            log_level: "info".to_string(),
            log_file: Some(default_log_file()),
            pid_file: Some(default_pid_file()),
            interface: "eth0".to_string(),
        }
    }
}

fn default_log_file() -> PathBuf {
    if cfg!(target_os = "macos") || cfg!(target_os = "linux") {
        PathBuf::from("/var/log/dot1x/daemon.log")
    } else if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\ProgramData\dot1x\logs\daemon.log")
    } else {
        PathBuf::from("daemon.log")
    }
}

fn default_pid_file() -> PathBuf {
    if cfg!(target_os = "macos") || cfg!(target_os = "linux") {
        PathBuf::from("/var/run/dot1x.pid")
    } else if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\ProgramData\dot1x\dot1x.pid")
    } else {
        PathBuf::from("dot1x.pid")
    }
}

/// IPC configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Unix socket path (Unix) or named pipe path (Windows).
    pub socket_path: String,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
        }
    }
}

fn default_socket_path() -> String {
    if cfg!(windows) {
        r"\\.\pipe\dot1x".to_string()
    } else {
        "/var/run/dot1x.sock".to_string()
    }
}

/// Which role this daemon instance hosts, and that role's configuration
/// (spec.md §0: "`dot1x-daemon` — background service hosting either
/// role").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RoleConfig {
    /// Host the authenticator side on one or more ports.
    Authenticator(AuthenticatorRoleConfig),
    /// Host the supplicant side on a single port.
    Supplicant(SupplicantRoleConfig),
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self::Authenticator(AuthenticatorRoleConfig::default())
    }
}

/// Authenticator-role configuration: one `PortConfig` per switch port,
/// plus the shared RADIUS server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticatorRoleConfig {
    /// Per-port configuration, in port-index order.
    pub ports: Vec<PortConfig>,
    /// RADIUS server to authenticate against.
    pub radius: RadiusServerConfig,
}

impl Default for AuthenticatorRoleConfig {
    fn default() -> Self {
        Self {
            ports: vec![PortConfig::default()],
            radius: RadiusServerConfig {
                server_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                server_port: 1812,
                shared_secret: Vec::new(),
            },
        }
    }
}

/// Supplicant-role configuration: the one port this instance speaks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplicantRoleConfig {
    /// Timer/policy configuration.
    pub config: SupplicantConfig,
}

impl Default for SupplicantRoleConfig {
    fn default() -> Self {
        Self {
            config: SupplicantConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        DaemonConfig::default().validate().unwrap();
    }

    #[test]
    fn round_trips_through_toml() {
        let config = DaemonConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: DaemonConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.general.interface, config.general.interface);
    }

    #[test]
    fn rejects_invalid_port_config() {
        let mut config = DaemonConfig::default();
        config.role = RoleConfig::Authenticator(AuthenticatorRoleConfig {
            ports: vec![PortConfig {
                server_timeout_secs: 0,
                ..PortConfig::default()
            }],
            radius: RadiusServerConfig::default(),
        });
        assert!(config.validate().is_err());
    }
}
