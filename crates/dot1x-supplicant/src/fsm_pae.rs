//! Supplicant PAE FSM (802.1X-2004 Supplicant PAE, spec.md §4.7).
//!
//! `CONNECTING` both starts the EAP exchange and, while waiting, resends
//! EAPOL-Start up to `maxStart` times (mirrored on the authenticator side's
//! `emit_canned_on_start`: a side effect evaluated every step, not only on
//! entry). Exhausting `maxStart` while the link reports no 802.1X-aware
//! peer (`portValid`) falls back to treating the port as authorized
//! without completing EAP (spec.md §8 scenario "Supplicant fallback").

use crate::state::SupplicantPaeState;
use crate::supplicant::Supplicant;
use dot1x_types::stats::{AuthPortStatus, PortControl, SessionTerminateCause};

/// Runs one step of the supplicant PAE FSM.
pub fn step(supplicant: &mut Supplicant) -> bool {
    let previous_state = supplicant.pae_state;
    let previous_status = supplicant.auth_port_status;

    let global = global_transition(supplicant);
    let next = global.unwrap_or_else(|| state_transition(supplicant));

    if next != previous_state {
        supplicant.pae_state = next;
        on_entry(supplicant, next);
    }

    let retransmitted = maybe_retransmit_start(supplicant);

    next != previous_state
        || supplicant.auth_port_status != previous_status
        || retransmitted
}

fn global_transition(supplicant: &Supplicant) -> Option<SupplicantPaeState> {
    if !supplicant.port_enabled {
        return Some(SupplicantPaeState::Disconnected);
    }
    if supplicant.logoff {
        return Some(SupplicantPaeState::Logoff);
    }
    match supplicant.port_control {
        PortControl::ForceAuth if supplicant.pae_state != SupplicantPaeState::SForceAuth => {
            Some(SupplicantPaeState::SForceAuth)
        }
        PortControl::ForceUnauth if supplicant.pae_state != SupplicantPaeState::SForceUnauth => {
            Some(SupplicantPaeState::SForceUnauth)
        }
        _ => None,
    }
}

fn state_transition(supplicant: &Supplicant) -> SupplicantPaeState {
    use SupplicantPaeState as S;
    match supplicant.pae_state {
        S::Disconnected => S::Connecting,
        S::Logoff if !supplicant.logoff => S::Disconnected,
        S::Connecting if supplicant.auth_success => S::Authenticated,
        S::Connecting if supplicant.auth_fail || supplicant.auth_timeout => S::Held,
        S::Connecting
            if supplicant.start_count > supplicant.config.max_start && supplicant.port_valid =>
        {
            S::Authenticated
        }
        S::Connecting if supplicant.start_count > supplicant.config.max_start => S::Held,
        S::Authenticated if supplicant.auth_fail || supplicant.auth_timeout => S::Restart,
        S::Held if supplicant.held_while == 0 => S::Restart,
        S::Restart => S::Connecting,
        other => other,
    }
}

/// Resends EAPOL-Start while parked in `CONNECTING` waiting for the first
/// reply, up to `maxStart` attempts (spec.md §4.7).
fn maybe_retransmit_start(supplicant: &mut Supplicant) -> bool {
    if supplicant.pae_state != SupplicantPaeState::Connecting {
        return false;
    }
    if supplicant.start_when != 0 || supplicant.start_count >= supplicant.config.max_start {
        return false;
    }
    supplicant.start_count += 1;
    supplicant.start_when = supplicant.config.start_period_secs;
    supplicant.send_start = true;
    true
}

fn on_entry(supplicant: &mut Supplicant, state: SupplicantPaeState) {
    use SupplicantPaeState as S;
    match state {
        S::Disconnected => {
            supplicant.eap_restart = true;
            set_status(supplicant, AuthPortStatus::Unauthorized, SessionTerminateCause::PortFailure);
        }
        S::Logoff => {
            supplicant.send_logoff = true;
            set_status(
                supplicant,
                AuthPortStatus::Unauthorized,
                SessionTerminateCause::SupplicantLogoff,
            );
        }
        S::Connecting => {
            supplicant.start_count = 1;
            supplicant.start_when = supplicant.config.start_period_secs;
            supplicant.send_start = true;
            supplicant.eap_restart = true;
        }
        S::Authenticated => {
            set_status(supplicant, AuthPortStatus::Authorized, SessionTerminateCause::NotTerminatedYet);
        }
        S::Held => {
            supplicant.held_while = supplicant.config.held_period_secs;
            set_status(supplicant, AuthPortStatus::Unauthorized, SessionTerminateCause::PortFailure);
        }
        S::Restart => {
            supplicant.eap_restart = true;
        }
        S::SForceAuth => {
            set_status(supplicant, AuthPortStatus::Authorized, SessionTerminateCause::NotTerminatedYet);
        }
        S::SForceUnauth => {
            set_status(
                supplicant,
                AuthPortStatus::Unauthorized,
                SessionTerminateCause::AuthControlForceUnauth,
            );
        }
    }
}

fn set_status(supplicant: &mut Supplicant, status: AuthPortStatus, cause: SessionTerminateCause) {
    supplicant.auth_port_status = status;
    supplicant.session.session_terminate_cause = Some(cause);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot1x_types::config::SupplicantConfig;
    use dot1x_types::mac::MacAddr;

    fn port_with_control(control: PortControl) -> Supplicant {
        let mut config = SupplicantConfig::default();
        config.max_start = 3;
        let mut supplicant = Supplicant::new(MacAddr([0; 6]), config);
        supplicant.port_control = control;
        supplicant
    }

    #[test]
    fn auto_mode_settles_into_connecting() {
        let mut supplicant = port_with_control(PortControl::Auto);
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Connecting);
        assert!(supplicant.send_start);
        assert_eq!(supplicant.start_count, 1);
    }

    #[test]
    fn backend_success_authorizes() {
        let mut supplicant = port_with_control(PortControl::Auto);
        step(&mut supplicant); // -> Connecting
        supplicant.auth_success = true;
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Authenticated);
        assert_eq!(supplicant.auth_port_status, AuthPortStatus::Authorized);
    }

    #[test]
    fn backend_failure_enters_held_then_restarts_after_timeout() {
        let mut supplicant = port_with_control(PortControl::Auto);
        step(&mut supplicant); // -> Connecting
        supplicant.auth_fail = true;
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Held);
        assert_eq!(supplicant.auth_port_status, AuthPortStatus::Unauthorized);

        supplicant.held_while = 0;
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Restart);
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Connecting);
    }

    #[test]
    fn exhausting_max_start_on_a_valid_link_falls_back_to_authenticated() {
        let mut supplicant = port_with_control(PortControl::Auto);
        step(&mut supplicant); // -> Connecting
        supplicant.port_valid = true;
        supplicant.start_count = supplicant.config.max_start + 1;
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Authenticated);
    }

    #[test]
    fn exhausting_max_start_on_an_unaware_link_enters_held() {
        let mut supplicant = port_with_control(PortControl::Auto);
        step(&mut supplicant); // -> Connecting
        supplicant.port_valid = false;
        supplicant.start_count = supplicant.config.max_start + 1;
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Held);
    }

    #[test]
    fn force_auth_overrides_auto_policy() {
        let mut supplicant = port_with_control(PortControl::ForceAuth);
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::SForceAuth);
        assert_eq!(supplicant.auth_port_status, AuthPortStatus::Authorized);
    }

    #[test]
    fn logoff_takes_priority_over_connecting() {
        let mut supplicant = port_with_control(PortControl::Auto);
        step(&mut supplicant); // -> Connecting
        supplicant.logoff = true;
        step(&mut supplicant);
        assert_eq!(supplicant.pae_state, SupplicantPaeState::Logoff);
        assert!(supplicant.send_logoff);
    }
}
