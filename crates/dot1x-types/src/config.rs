//! Configuration types for dot1x (spec.md §6, "Configuration (recognized
//! options)").

use crate::error::{Error, Result};
use crate::stats::PortControl;
use serde::{Deserialize, Serialize};

/// Per-port authenticator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    /// PAE mode for this port.
    pub port_control: PortControl,
    /// `HELD` state duration, in seconds.
    pub quiet_period_secs: u16,
    /// Backend `aWhile` timeout, in seconds.
    pub server_timeout_secs: u16,
    /// EAP retransmit cap.
    pub max_retrans: u32,
    /// `CONNECTING` retry cap.
    pub re_auth_max: u32,
    /// Reauthentication interval, in seconds.
    pub re_auth_period_secs: u32,
    /// Whether the reauthentication timer is armed.
    pub re_auth_enabled: bool,
    /// Reported via the MIB; no behavioral effect in this core (spec.md §6).
    pub key_tx_enabled: bool,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_control: PortControl::default(),
            quiet_period_secs: 60,
            server_timeout_secs: 30,
            max_retrans: 4,
            re_auth_max: 2,
            re_auth_period_secs: 3600,
            re_auth_enabled: false,
            key_tx_enabled: false,
        }
    }
}

impl PortConfig {
    /// Validates every field against the range column of spec.md §6,
    /// without mutating `self` (the "verify" half of the two-phase commit
    /// described in spec.md §4.10).
    pub fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.server_timeout_secs) {
            return Err(Error::config(format!(
                "server_timeout_secs must be in 1..=3600, got {}",
                self.server_timeout_secs
            )));
        }
        if !(10..=86400).contains(&self.re_auth_period_secs) {
            return Err(Error::config(format!(
                "re_auth_period_secs must be in 10..=86400, got {}",
                self.re_auth_period_secs
            )));
        }
        // quiet_period_secs is a u16, so the upper bound of 65535 is implicit;
        // no further check is required.
        Ok(())
    }
}

/// Supplicant-side policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplicantConfig {
    /// EAPOL-Start retransmission interval, in seconds.
    pub start_period_secs: u32,
    /// Maximum EAPOL-Start attempts before falling back (spec.md §4.7).
    pub max_start: u32,
    /// `HELD` state duration, in seconds.
    pub held_period_secs: u32,
    /// Backend `authWhile` timeout, in seconds.
    pub auth_period_secs: u32,
    /// Peer `idleWhile` timeout, in seconds.
    pub client_timeout_secs: u32,
    /// Whether an unsolicited canned EAP-Success is accepted when `lastId`
    /// is the sentinel (spec.md §9 Open Questions: `allowCanned`).
    pub allow_canned_success: bool,
    /// Identity presented in EAP-Response/Identity.
    pub identity: String,
    /// Password used by MD5-Challenge, if configured.
    pub md5_password: Option<String>,
}

impl Default for SupplicantConfig {
    fn default() -> Self {
        Self {
            start_period_secs: 30,
            max_start: 3,
            held_period_secs: 60,
            auth_period_secs: 30,
            client_timeout_secs: 60,
            allow_canned_success: true,
            identity: String::new(),
            md5_password: None,
        }
    }
}

impl SupplicantConfig {
    /// Validates every field against the range column of spec.md §6.
    pub fn validate(&self) -> Result<()> {
        if self.start_period_secs == 0 {
            return Err(Error::config("start_period_secs must be >= 1"));
        }
        if self.max_start == 0 {
            return Err(Error::config("max_start must be >= 1"));
        }
        if self.held_period_secs == 0 {
            return Err(Error::config("held_period_secs must be >= 1"));
        }
        if self.auth_period_secs == 0 {
            return Err(Error::config("auth_period_secs must be >= 1"));
        }
        if self.client_timeout_secs == 0 {
            return Err(Error::config("client_timeout_secs must be >= 1"));
        }
        Ok(())
    }
}

/// RADIUS server connection settings (spec.md §3, "Authenticator context").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusServerConfig {
    /// Server IP address.
    pub server_addr: std::net::IpAddr,
    /// Server UDP port (default 1812, spec.md §6).
    pub server_port: u16,
    /// Shared secret, up to 64 bytes.
    #[serde(skip_serializing)]
    pub shared_secret: Vec<u8>,
}

impl Default for RadiusServerConfig {
    fn default() -> Self {
        Self {
            server_addr: std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
            server_port: 1812,
            shared_secret: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_period_65535_is_representable_but_65536_is_not() {
        let mut cfg = PortConfig::default();
        cfg.quiet_period_secs = 65535;
        assert!(cfg.validate().is_ok());
        // 65536 cannot even be stored in a u16; the type itself enforces
        // the spec.md §8 boundary ("Setting quietPeriod = 65535 succeeds;
        // 65536 is rejected").
    }

    #[test]
    fn server_timeout_out_of_range_is_rejected() {
        let mut cfg = PortConfig::default();
        cfg.server_timeout_secs = 0;
        assert!(cfg.validate().is_err());
        cfg.server_timeout_secs = 3601;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn re_auth_period_minimum_is_ten_seconds() {
        let mut cfg = PortConfig::default();
        cfg.re_auth_period_secs = 9;
        assert!(cfg.validate().is_err());
        cfg.re_auth_period_secs = 10;
        assert!(cfg.validate().is_ok());
    }
}
