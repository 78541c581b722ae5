//! dot1x - IEEE 802.1X Port-Based Network Access Control
//!
//! A command-line tool for running an 802.1X authenticator or supplicant,
//! standalone or as a background daemon.

use clap::Parser;
use color_eyre::eyre::Result;

mod app;
mod commands;
mod logging;
mod runtime;
mod stubs;

use app::{Cli, Commands, DaemonCommands};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // A daemon backgrounding itself loses its stderr once it forks, so it
    // sets up its own file-based logging after loading its config, rather
    // than the stderr logger every other command uses.
    let backgrounding_daemon = match &cli.command {
        Commands::Daemon(args) => {
            matches!(args.command, Some(DaemonCommands::Run { foreground: false, .. }))
        }
        _ => false,
    };

    let _guard = if backgrounding_daemon {
        None
    } else {
        logging::init(cli.verbose, cli.quiet, None)
    };

    match cli.command {
        Commands::Authenticator(args) => commands::authenticator::run(args).await,
        Commands::Supplicant(args) => commands::supplicant::run(args).await,
        Commands::Daemon(args) => commands::daemon::run(args, cli.verbose, cli.quiet).await,
        Commands::Port(args) => commands::port::run(args, cli.format).await,
        Commands::Config(args) => commands::config::run(args).await,
        Commands::Completions(args) => commands::completions::run(args),
    }
}
