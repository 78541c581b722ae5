//! Shared types, configuration, and error definitions for dot1x.
//!
//! This crate has no protocol logic of its own; it is the vocabulary that
//! `dot1x-codec`, `dot1x-authenticator`, and `dot1x-supplicant` build on,
//! mirroring how `netdiag-types` underlies the rest of the `netdiag`
//! workspace.

pub mod config;
pub mod eap;
pub mod eapol;
pub mod error;
pub mod mac;
pub mod radius;
pub mod stats;

pub use error::{Error, Result};
