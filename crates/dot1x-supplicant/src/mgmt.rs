//! Management surface (spec.md §4.10), mirrored from the authenticator
//! side for the supplicant's own settable parameters: every setter
//! validates first and commits only on success.

use crate::context::SupplicantContext;
use crate::error::{ManagementError, Result};
use dot1x_methods::{IdentityMethod, Md5ChallengeMethod};
use dot1x_types::eap::EapType;
use dot1x_types::stats::PortControl;

impl SupplicantContext {
    /// Sets the identity presented in EAP-Response/Identity and refreshes
    /// the registered `IdentityMethod` to match.
    pub async fn set_identity(&self, identity: impl Into<String>) -> Result<()> {
        let identity = identity.into();
        self.with_supplicant(|supplicant| {
            supplicant.config.identity = identity.clone();
            supplicant.register_method(Box::new(IdentityMethod::new(identity.into_bytes())));
        })
        .await;
        Ok(())
    }

    /// Sets the MD5-Challenge password. Rejects an empty password, since
    /// `Md5ChallengeMethod` cannot be selected with one (spec.md §4.2).
    pub async fn set_md5_password(&self, password: impl Into<String>) -> Result<()> {
        let password = password.into();
        let Some(method) = Md5ChallengeMethod::new(password.clone()) else {
            return Err(ManagementError::WrongValue {
                parameter: "md5_password",
                value: "<empty>".to_string(),
            });
        };
        self.with_supplicant(|supplicant| {
            supplicant.config.md5_password = Some(password);
            supplicant.methods.remove(&EapType::Md5Challenge);
            supplicant.method_order.retain(|t| *t != EapType::Md5Challenge);
            supplicant.register_method(Box::new(method));
        })
        .await;
        Ok(())
    }

    /// Sets `logoff`, tearing the session down on the next tick (spec.md
    /// §4.7 `LOGOFF` state).
    pub async fn set_logoff(&self, logoff: bool) -> Result<()> {
        self.with_supplicant(|supplicant| supplicant.logoff = logoff)
            .await;
        Ok(())
    }

    /// Triggers a fresh EAP exchange. Self-clears once the peer FSM
    /// re-enters `INITIALIZE` (spec.md §4.10).
    pub async fn restart(&self) -> Result<()> {
        self.with_supplicant(|supplicant| supplicant.eap_restart = true)
            .await;
        Ok(())
    }

    /// Sets `portValid`, the supplicant's belief that the link is
    /// 802.1X-aware (spec.md §4.7: governs the `maxStart` fallback).
    pub async fn set_port_valid(&self, valid: bool) -> Result<()> {
        self.with_supplicant(|supplicant| supplicant.port_valid = valid)
            .await;
        Ok(())
    }

    /// Sets `portControl` (`ForceAuth`/`ForceUnauth`/`Auto`).
    pub async fn set_port_control(&self, control: PortControl) -> Result<()> {
        self.with_supplicant(|supplicant| supplicant.port_control = control)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplicant::Supplicant;
    use dot1x_platform::stub::ChannelPaeLink;
    use dot1x_types::config::SupplicantConfig;
    use dot1x_types::eap::EapType;
    use dot1x_types::mac::MacAddr;
    use std::sync::Arc;

    fn fresh_context() -> SupplicantContext {
        let supplicant = Supplicant::new(MacAddr([0; 6]), SupplicantConfig::default());
        let (link, _peer) = ChannelPaeLink::pair(MacAddr([0; 6]), MacAddr([0xff; 6]));
        SupplicantContext::new(supplicant, Arc::new(link))
    }

    #[tokio::test]
    async fn set_identity_registers_matching_method() {
        let ctx = fresh_context();
        ctx.set_identity("alice").await.unwrap();
        ctx.with_supplicant(|supplicant| {
            assert_eq!(supplicant.config.identity, "alice");
            assert!(supplicant.methods.contains_key(&EapType::Identity));
        })
        .await;
    }

    #[tokio::test]
    async fn rejects_empty_md5_password() {
        let ctx = fresh_context();
        let err = ctx.set_md5_password("").await.unwrap_err();
        assert_eq!(
            err,
            ManagementError::WrongValue {
                parameter: "md5_password",
                value: "<empty>".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn set_md5_password_registers_method() {
        let ctx = fresh_context();
        ctx.set_md5_password("secret").await.unwrap();
        ctx.with_supplicant(|supplicant| {
            assert_eq!(supplicant.config.md5_password.as_deref(), Some("secret"));
            assert!(supplicant.methods.contains_key(&EapType::Md5Challenge));
        })
        .await;
    }

    #[tokio::test]
    async fn set_logoff_sets_flag() {
        let ctx = fresh_context();
        ctx.set_logoff(true).await.unwrap();
        ctx.with_supplicant(|supplicant| assert!(supplicant.logoff))
            .await;
    }

    #[tokio::test]
    async fn restart_sets_eap_restart() {
        let ctx = fresh_context();
        ctx.with_supplicant(|supplicant| supplicant.eap_restart = false)
            .await;
        ctx.restart().await.unwrap();
        ctx.with_supplicant(|supplicant| assert!(supplicant.eap_restart))
            .await;
    }
}
