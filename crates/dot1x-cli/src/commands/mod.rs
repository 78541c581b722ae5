//! Subcommand implementations.

pub mod authenticator;
pub mod completions;
pub mod config;
pub mod daemon;
pub mod port;
pub mod supplicant;
