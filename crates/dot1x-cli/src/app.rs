//! CLI application definition using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// dot1x - IEEE 802.1X Port-Based Network Access Control
#[derive(Parser, Debug)]
#[command(
    name = "dot1x",
    author,
    version,
    about = "IEEE 802.1X port-based network access control",
    long_about = "Runs an 802.1X authenticator or supplicant, standalone or as a \
                  background daemon, and manages ports through a local control socket."
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a standalone authenticator.
    Authenticator(AuthenticatorArgs),

    /// Run a standalone supplicant.
    Supplicant(SupplicantArgs),

    /// Daemon service management.
    Daemon(DaemonArgs),

    /// Inspect or change a managed port.
    Port(PortArgs),

    /// Configuration management.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Output format options.
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Arguments for the authenticator command.
#[derive(Parser, Debug)]
pub struct AuthenticatorArgs {
    /// Subcommand.
    #[command(subcommand)]
    pub command: AuthenticatorCommands,
}

/// Authenticator subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthenticatorCommands {
    /// Run the authenticator in the foreground.
    Run {
        /// Daemon configuration file (authenticator role section).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Arguments for the supplicant command.
#[derive(Parser, Debug)]
pub struct SupplicantArgs {
    /// Subcommand.
    #[command(subcommand)]
    pub command: SupplicantCommands,
}

/// Supplicant subcommands.
#[derive(Subcommand, Debug)]
pub enum SupplicantCommands {
    /// Run the supplicant in the foreground.
    Run {
        /// Daemon configuration file (supplicant role section).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Identity to authenticate as (registers the Identity method).
        #[arg(short, long)]
        identity: Option<String>,

        /// MD5-Challenge password (registers the MD5-Challenge method).
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Arguments for the daemon command.
#[derive(Parser, Debug)]
pub struct DaemonArgs {
    /// Subcommand.
    #[command(subcommand)]
    pub command: Option<DaemonCommands>,
}

/// Daemon subcommands.
#[derive(Subcommand, Debug)]
pub enum DaemonCommands {
    /// Run the daemon (foreground or daemonized).
    Run {
        /// Run in foreground (don't daemonize).
        #[arg(short, long)]
        foreground: bool,

        /// Configuration file path.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Stop the daemon.
    Stop,
    /// Show daemon status.
    Status,
    /// Install as a system service.
    Install,
    /// Uninstall the system service.
    Uninstall,
    /// Show the daemon's log file.
    Logs {
        /// Number of trailing lines to show.
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,
        /// Keep following the log file for new lines.
        #[arg(short, long)]
        follow: bool,
    },
}

/// Arguments for the port command.
#[derive(Parser, Debug)]
pub struct PortArgs {
    /// Subcommand.
    #[command(subcommand)]
    pub command: PortCommands,

    /// Daemon control socket path (overrides the default).
    #[arg(long, global = true)]
    pub socket: Option<String>,
}

/// Port subcommands.
#[derive(Subcommand, Debug)]
pub enum PortCommands {
    /// List every managed port.
    List,
    /// Show one port's configuration and live state.
    Show {
        /// Port index.
        index: u32,
    },
    /// Show one port's statistics.
    Stats {
        /// Port index.
        index: u32,
    },
    /// Set a management-surface field on a port.
    Set {
        /// Port index.
        index: u32,
        /// Field name (e.g. `quiet_period_secs`, `re_auth_enabled`).
        field: String,
        /// New value, as text.
        value: String,
        /// Validate only, without committing the change.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Arguments for the config command.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand.
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the configuration that would be loaded.
    Show {
        /// Configuration file path.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the default configuration to a file.
    Init {
        /// Destination file path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file.
    Validate {
        /// Configuration file path.
        config: PathBuf,
    },
}

/// Arguments for the completions command.
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Shell options for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    /// Bash.
    Bash,
    /// Zsh.
    Zsh,
    /// Fish.
    Fish,
    /// `PowerShell`.
    PowerShell,
    /// Elvish.
    Elvish,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
