//! Daemon service management command.

use crate::app::{DaemonArgs, DaemonCommands};
use crate::runtime;
use color_eyre::eyre::{eyre, Result};
use dot1x_daemon::config::DaemonConfig;
use dot1x_daemon::ipc::{IpcClient, IpcRequest, IpcResponse};
use dot1x_daemon::service::DaemonService;
use std::path::PathBuf;

/// Runs the daemon command.
pub async fn run(args: DaemonArgs, verbose: u8, quiet: bool) -> Result<()> {
    match args.command {
        Some(DaemonCommands::Run { foreground, config }) => {
            run_daemon(foreground, config, verbose, quiet).await
        }
        Some(DaemonCommands::Stop) => stop_daemon().await,
        Some(DaemonCommands::Status) => show_status().await,
        Some(DaemonCommands::Install) => install().await,
        Some(DaemonCommands::Uninstall) => uninstall().await,
        Some(DaemonCommands::Logs { lines, follow }) => show_logs(lines, follow).await,
        None => show_status().await,
    }
}

async fn run_daemon(
    foreground: bool,
    config_path: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
) -> Result<()> {
    let config = if let Some(path) = config_path {
        DaemonConfig::load(&path)?
    } else {
        let user_path = DaemonConfig::user_path();
        let system_path = DaemonConfig::default_path();
        if let Some(path) = user_path.filter(|p| p.exists()) {
            DaemonConfig::load(&path)?
        } else if system_path.exists() {
            DaemonConfig::load(&system_path)?
        } else {
            DaemonConfig::default()
        }
    };

    if let Some(pid_file) = &config.general.pid_file {
        if let Some(pid) = DaemonService::is_already_running(pid_file) {
            return Err(eyre!("daemon is already running (PID: {pid})"));
        }
    }

    // Held for the life of a backgrounded daemon; dropping it would stop
    // the file writer. Unused (and dropped immediately) in the foreground
    // case, where logging already went to stderr via `main`'s init.
    let mut _log_guard = None;

    if !foreground {
        #[cfg(unix)]
        {
            println!("starting daemon...");
            _log_guard = crate::logging::init(verbose, quiet, config.general.log_file.as_deref());
            dot1x_daemon::service::daemonize()?;
        }
        #[cfg(windows)]
        {
            return Err(eyre!(
                "on Windows, use 'dot1x daemon install' to run as a service"
            ));
        }
    }

    let role = runtime::build_role_context(&config);
    let mut service = DaemonService::new(config, role);
    service.start().await?;

    if foreground {
        println!("daemon running in foreground (Ctrl+C to stop)");
        tokio::select! {
            result = service.run() => result?,
            _ = tokio::signal::ctrl_c() => {}
        }
        service.stop().await?;
    }

    Ok(())
}

async fn show_logs(lines: usize, follow: bool) -> Result<()> {
    let config = DaemonConfig::default();
    let log_file = config
        .general
        .log_file
        .as_ref()
        .ok_or_else(|| eyre!("no log file configured"))?;

    if !log_file.exists() {
        return Err(eyre!("log file does not exist: {log_file:?}"));
    }

    if follow {
        let mut cmd = std::process::Command::new("tail")
            .args(["-f", "-n", &lines.to_string()])
            .arg(log_file)
            .spawn()?;
        cmd.wait()?;
    } else {
        let output = std::process::Command::new("tail")
            .args(["-n", &lines.to_string()])
            .arg(log_file)
            .output()?;
        print!("{}", String::from_utf8_lossy(&output.stdout));
    }

    Ok(())
}

async fn stop_daemon() -> Result<()> {
    let config = DaemonConfig::default();
    let mut client = IpcClient::new(config.ipc.socket_path.clone());

    if client.connect().await.is_err() {
        return Err(eyre!("daemon is not running"));
    }

    match client.request(&IpcRequest::Stop).await? {
        IpcResponse::Ok { message } => {
            println!("daemon stopping: {}", message.unwrap_or_default());
            Ok(())
        }
        IpcResponse::Error { message } => Err(eyre!("failed to stop daemon: {message}")),
        _ => Err(eyre!("unexpected response from daemon")),
    }
}

async fn show_status() -> Result<()> {
    let config = DaemonConfig::default();
    let mut client = IpcClient::new(config.ipc.socket_path.clone());

    if client.connect().await.is_err() {
        println!("daemon status: stopped");
        return Ok(());
    }

    match client.request(&IpcRequest::Status).await? {
        IpcResponse::Status {
            state,
            uptime_secs,
            port_count,
        } => {
            println!("daemon status: {state:?}");
            println!("  uptime: {uptime_secs}s");
            println!("  ports managed: {port_count}");
            Ok(())
        }
        IpcResponse::Error { message } => Err(eyre!("failed to get status: {message}")),
        _ => Err(eyre!("unexpected response from daemon")),
    }
}

async fn install() -> Result<()> {
    let config = DaemonConfig::default();
    #[cfg(any(target_os = "macos", target_os = "linux"))]
    {
        dot1x_daemon::service::install_service(&config)?;
        println!("service installed successfully");
        Ok(())
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = config;
        Err(eyre!("service installation not supported on this platform"))
    }
}

async fn uninstall() -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        let plist_path = "/Library/LaunchDaemons/net.dot1x.daemon.plist";
        if std::path::Path::new(plist_path).exists() {
            std::process::Command::new("launchctl")
                .args(["unload", plist_path])
                .output()?;
            std::fs::remove_file(plist_path)?;
            println!("service uninstalled successfully");
        } else {
            println!("service is not installed");
        }
        Ok(())
    }

    #[cfg(target_os = "linux")]
    {
        let service_path = "/etc/systemd/system/dot1x.service";
        if std::path::Path::new(service_path).exists() {
            std::process::Command::new("systemctl")
                .args(["stop", "dot1x"])
                .output()?;
            std::process::Command::new("systemctl")
                .args(["disable", "dot1x"])
                .output()?;
            std::fs::remove_file(service_path)?;
            std::process::Command::new("systemctl")
                .args(["daemon-reload"])
                .output()?;
            println!("service uninstalled successfully");
        } else {
            println!("service is not installed");
        }
        Ok(())
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        Err(eyre!("service uninstallation not supported on this platform"))
    }
}
