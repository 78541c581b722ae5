//! Management surface (spec.md §4.10): two-phase-commit setters over the
//! per-port configuration and the `initialize`/`reauthenticate` triggers.
//! Every setter validates first and commits only on success — a rejected
//! write leaves the port's state untouched.

use crate::context::AuthenticatorContext;
use crate::error::{ManagementError, Result};
use dot1x_types::stats::{PortControl, SessionTerminateCause};

impl AuthenticatorContext {
    /// Sets `quietPeriod`. The full `u16` range is valid (spec.md §4.10).
    pub async fn set_quiet_period(&self, index: u32, secs: u16) -> Result<()> {
        self.with_port(index, |port| port.config.quiet_period_secs = secs)
            .await
    }

    /// Sets `serverTimeout`, valid range `1..=3600` (spec.md §4.10).
    pub async fn set_server_timeout(&self, index: u32, secs: u16) -> Result<()> {
        if !(1..=3600).contains(&secs) {
            return Err(ManagementError::WrongValue {
                parameter: "server_timeout_secs",
                value: secs.to_string(),
            });
        }
        self.with_port(index, |port| port.config.server_timeout_secs = secs)
            .await
    }

    /// Sets `reAuthPeriod`, valid range `10..=86400` (spec.md §4.10).
    pub async fn set_reauth_period(&self, index: u32, secs: u32) -> Result<()> {
        if !(10..=86400).contains(&secs) {
            return Err(ManagementError::WrongValue {
                parameter: "re_auth_period_secs",
                value: secs.to_string(),
            });
        }
        self.with_port(index, |port| port.config.re_auth_period_secs = secs)
            .await
    }

    /// Sets `reAuthEnabled`.
    pub async fn set_reauth_enabled(&self, index: u32, enabled: bool) -> Result<()> {
        self.with_port(index, |port| port.config.re_auth_enabled = enabled)
            .await
    }

    /// Sets `portControl` (`ForceUnauth`/`ForceAuth`/`Auto`).
    pub async fn set_port_control(&self, index: u32, control: PortControl) -> Result<()> {
        self.with_port(index, |port| port.config.port_control = control)
            .await
    }

    /// Sets `keyTxEnabled`.
    pub async fn set_key_tx_enabled(&self, index: u32, enabled: bool) -> Result<()> {
        self.with_port(index, |port| port.config.key_tx_enabled = enabled)
            .await
    }

    /// Triggers a full port reinitialization. Self-clears once the FSMs
    /// have run their `INITIALIZE` entry actions (spec.md §4.10:
    /// "`initialize` is write-only from the operator's perspective").
    pub async fn initialize_port(&self, index: u32) -> Result<()> {
        self.with_port(index, |port| {
            port.initialize = true;
            port.session.session_terminate_cause = Some(SessionTerminateCause::PortReinit);
        })
        .await
    }

    /// Triggers a reauthentication. Self-clears once the PAE FSM re-enters
    /// `RESTART` (spec.md §4.10).
    pub async fn reauthenticate_port(&self, index: u32) -> Result<()> {
        self.with_port(index, |port| port.reauthenticate = true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Port;
    use dot1x_platform::stub::{ChannelPaeLink, MemorySwitchDriver, QueueRadiusTransport};
    use dot1x_types::config::{PortConfig, RadiusServerConfig};
    use dot1x_types::mac::MacAddr;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    fn single_port_context() -> AuthenticatorContext {
        let port = Port::new(0, MacAddr([0; 6]), PortConfig::default());
        let (link, _peer) = ChannelPaeLink::pair(MacAddr([0; 6]), MacAddr([0xff; 6]));
        let (radius_transport, _out_rx, _in_tx) = QueueRadiusTransport::new();
        AuthenticatorContext::new(
            vec![(port, Arc::new(link) as Arc<dyn dot1x_platform::PaeLinkProvider>)],
            Arc::new(MemorySwitchDriver::default()) as Arc<dyn dot1x_platform::SwitchDriver>,
            Arc::new(radius_transport) as Arc<dyn dot1x_platform::RadiusTransport>,
            RadiusServerConfig {
                server_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
                server_port: 1812,
                shared_secret: b"secret".to_vec(),
            },
            "eth0".to_string(),
            MacAddr([0; 6]),
        )
    }

    #[tokio::test]
    async fn rejects_out_of_range_server_timeout() {
        let ctx = single_port_context();
        let err = ctx.set_server_timeout(0, 0).await.unwrap_err();
        assert_eq!(
            err,
            ManagementError::WrongValue {
                parameter: "server_timeout_secs",
                value: "0".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn rejects_out_of_range_reauth_period() {
        let ctx = single_port_context();
        assert!(ctx.set_reauth_period(0, 5).await.is_err());
        assert!(ctx.set_reauth_period(0, 90_000).await.is_err());
        assert!(ctx.set_reauth_period(0, 3600).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_port_index_is_rejected() {
        let ctx = single_port_context();
        let err = ctx.set_quiet_period(7, 30).await.unwrap_err();
        assert_eq!(err, ManagementError::InvalidPort { index: 7 });
    }

    #[tokio::test]
    async fn initialize_runs_the_fsm_and_clears_the_flag() {
        use crate::state::AuthPaeState;

        let ctx = single_port_context();
        ctx.initialize_port(0).await.unwrap();
        ctx.with_port(0, |port| {
            // `initialize` is write-only: the fixpoint sweep that `with_port`
            // re-runs drives INITIALIZE's entry action (which clears it)
            // before the call returns, rather than leaving it set until the
            // next 1Hz tick.
            assert!(!port.initialize);
            assert_eq!(port.pae_state, AuthPaeState::Disconnected);
            assert!(port.session.session_terminate_cause.is_some());
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn reauthenticate_from_authenticated_runs_the_fsm_synchronously() {
        use crate::state::AuthPaeState;

        let ctx = single_port_context();
        // Drive the port out of INITIALIZE and into AUTHENTICATED by hand so
        // `reauthenticate` has somewhere meaningful to restart from.
        ctx.with_port(0, |port| {
            port.pae_state = AuthPaeState::Authenticated;
            port.pae_primed = true;
            port.initialize = false;
        })
        .await
        .unwrap();

        ctx.reauthenticate_port(0).await.unwrap();

        ctx.with_port(0, |port| {
            assert!(!port.reauthenticate);
            assert_eq!(port.pae_state, AuthPaeState::Connecting);
        })
        .await
        .unwrap();
    }
}
