//! Builds an [`AuthenticatorContext`]/[`SupplicantContext`] from a
//! [`DaemonConfig`], shared by the standalone `run` commands and the
//! daemon command.

use crate::stubs::{IdleLink, IdleRadiusTransport};
use dot1x_authenticator::{AuthenticatorContext, Port};
use dot1x_daemon::config::{AuthenticatorRoleConfig, DaemonConfig, RoleConfig, SupplicantRoleConfig};
use dot1x_daemon::service::RoleContext;
use dot1x_methods::{IdentityMethod, Md5ChallengeMethod};
use dot1x_platform::stub::MemorySwitchDriver;
use dot1x_platform::PaeLinkProvider;
use dot1x_supplicant::{Supplicant, SupplicantContext};
use dot1x_types::mac::MacAddr;
use std::sync::Arc;

/// Builds the [`RoleContext`] a [`DaemonService`](dot1x_daemon::service::DaemonService)
/// or a standalone `run` command hosts, given the configured role. Uses
/// the idle platform stand-ins until a real raw-socket backend is wired
/// in (spec.md §1: the NIC driver and RADIUS transport are external
/// collaborators).
#[must_use]
pub fn build_role_context(config: &DaemonConfig) -> RoleContext {
    match &config.role {
        RoleConfig::Authenticator(role) => {
            RoleContext::Authenticator(Arc::new(build_authenticator(config, role)))
        }
        RoleConfig::Supplicant(role) => {
            RoleContext::Supplicant(Arc::new(build_supplicant(role)))
        }
    }
}

/// Builds an authenticator context for one configured role.
pub fn build_authenticator(config: &DaemonConfig, role: &AuthenticatorRoleConfig) -> AuthenticatorContext {
    let bridge_mac = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x00]);
    tracing::warn!(
        %bridge_mac,
        "no NIC backend is wired up yet; hosting ports on an idle loopback link"
    );

    let ports = role
        .ports
        .iter()
        .enumerate()
        .map(|(i, port_config)| {
            let index = i as u32;
            let mac = MacAddr::derive_port_mac(bridge_mac, index as u8);
            let link: Arc<dyn PaeLinkProvider> = Arc::new(IdleLink::new(mac));
            (Port::new(index, mac, port_config.clone()), link)
        })
        .collect();

    AuthenticatorContext::new(
        ports,
        Arc::new(MemorySwitchDriver::default()),
        Arc::new(IdleRadiusTransport),
        role.radius.clone(),
        config.general.interface.clone(),
        bridge_mac,
    )
}

/// Builds a supplicant context for one configured role.
pub fn build_supplicant(role: &SupplicantRoleConfig) -> SupplicantContext {
    let mac = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    tracing::warn!(
        %mac,
        "no NIC backend is wired up yet; running against an idle loopback link"
    );

    let mut supplicant = Supplicant::new(mac, role.config.clone());
    if !role.config.identity.is_empty() {
        supplicant.register_method(Box::new(IdentityMethod::new(
            role.config.identity.clone().into_bytes(),
        )));
    }
    if let Some(password) = &role.config.md5_password {
        if let Some(method) = Md5ChallengeMethod::new(password.clone()) {
            supplicant.register_method(Box::new(method));
        }
    }

    let link: Arc<dyn PaeLinkProvider> = Arc::new(IdleLink::new(mac));
    SupplicantContext::new(supplicant, link)
}
