//! Standalone authenticator command.

use crate::app::{AuthenticatorArgs, AuthenticatorCommands};
use crate::runtime;
use color_eyre::eyre::Result;
use dot1x_daemon::config::{DaemonConfig, RoleConfig};
use std::sync::Arc;

/// Runs the authenticator command.
pub async fn run(args: AuthenticatorArgs) -> Result<()> {
    match args.command {
        AuthenticatorCommands::Run { config } => run_authenticator(config).await,
    }
}

async fn run_authenticator(config_path: Option<std::path::PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => DaemonConfig::load(&path)?,
        None => DaemonConfig::default(),
    };

    let RoleConfig::Authenticator(role) = &config.role else {
        return Err(color_eyre::eyre::eyre!(
            "configuration selects the supplicant role; use 'dot1x supplicant run'"
        ));
    };

    let context = Arc::new(runtime::build_authenticator(&config, role));
    context.start().await?;
    println!(
        "authenticator running on {} ({} port(s)); Ctrl+C to stop",
        config.general.interface,
        context.port_count()
    );

    tokio::select! {
        result = context.clone().run() => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("stopping...");
        }
    }

    context.stop().await?;
    Ok(())
}
