//! Standalone supplicant command.

use crate::app::{SupplicantArgs, SupplicantCommands};
use crate::runtime;
use color_eyre::eyre::Result;
use dot1x_daemon::config::{DaemonConfig, RoleConfig};
use std::sync::Arc;

/// Runs the supplicant command.
pub async fn run(args: SupplicantArgs) -> Result<()> {
    match args.command {
        SupplicantCommands::Run {
            config,
            identity,
            password,
        } => run_supplicant(config, identity, password).await,
    }
}

async fn run_supplicant(
    config_path: Option<std::path::PathBuf>,
    identity: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => DaemonConfig::load(&path)?,
        None => DaemonConfig::default(),
    };

    let RoleConfig::Supplicant(role) = &mut config.role else {
        return Err(color_eyre::eyre::eyre!(
            "configuration selects the authenticator role; use 'dot1x authenticator run'"
        ));
    };

    if let Some(identity) = identity {
        role.config.identity = identity;
    }
    if let Some(password) = password {
        role.config.md5_password = Some(password);
    }

    let identity = role.config.identity.clone();
    let context = Arc::new(runtime::build_supplicant(role));

    println!(
        "supplicant running as '{}' on {}; Ctrl+C to stop",
        identity, config.general.interface
    );

    tokio::select! {
        result = context.clone().run() => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("stopping...");
        }
    }

    Ok(())
}
