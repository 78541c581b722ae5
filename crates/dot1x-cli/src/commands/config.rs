//! Config command implementation.

use crate::app::{ConfigArgs, ConfigCommands};
use color_eyre::eyre::Result;
use console::style;
use dot1x_daemon::config::DaemonConfig;

/// Runs the config command.
pub async fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        Some(ConfigCommands::Show { config }) => run_show(config).await,
        Some(ConfigCommands::Init { output }) => run_init(output).await,
        Some(ConfigCommands::Validate { config }) => run_validate(config).await,
        None => run_show(None).await,
    }
}

async fn run_show(config_path: Option<std::path::PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => DaemonConfig::load(&path)?,
        None => {
            let user_path = DaemonConfig::user_path();
            let system_path = DaemonConfig::default_path();
            if let Some(path) = user_path.filter(|p| p.exists()) {
                DaemonConfig::load(&path)?
            } else if system_path.exists() {
                DaemonConfig::load(&system_path)?
            } else {
                DaemonConfig::default()
            }
        }
    };

    println!("{}", style("Current Configuration").bold().underlined());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

async fn run_init(output: Option<std::path::PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(DaemonConfig::default_path);
    DaemonConfig::default().save(&path)?;
    println!("{} {}", style("wrote default configuration to").green(), path.display());
    Ok(())
}

async fn run_validate(path: std::path::PathBuf) -> Result<()> {
    let config = DaemonConfig::load(&path)?;
    config.validate()?;
    println!("{}", style("configuration is valid").green());
    Ok(())
}
