//! Authenticator PAE FSM (802.1X-2004 §8.2.4, spec.md §4.4).

use crate::port::Port;
use crate::state::AuthPaeState;
use dot1x_codec::{build_canned, next_id};
use dot1x_types::eap::EapCode;
use dot1x_types::stats::{AuthPortStatus, PortControl, SessionTerminateCause};

/// Runs one step of the Authenticator PAE FSM. Returns `true` if the
/// state (or a variable the other FSMs watch) changed, so the fixpoint
/// scheduler keeps sweeping.
pub fn step(port: &mut Port) -> bool {
    let previous_state = port.pae_state;
    let previous_status = port.auth_port_status;
    // `pae_state` is constructed already sitting in `INITIALIZE`, so the
    // very first call would otherwise see `next == previous_state` and
    // skip `on_entry` — never clearing `initialize`. Force it once.
    let first_run = !port.pae_primed;
    port.pae_primed = true;

    let global = global_transition(port);
    let next = global.unwrap_or_else(|| state_transition(port));

    if next != previous_state || first_run {
        port.pae_state = next;
        on_entry(port, previous_state, next);
    }

    let canned_sent = emit_canned_on_start(port);

    next != previous_state || first_run || port.auth_port_status != previous_status || canned_sent
}

/// FORCE_AUTH/FORCE_UNAUTH emit a fresh canned EAP Success/Failure on
/// every EAPOL-Start, not only on first entry into the state (spec.md
/// §4.4: "emits a canned EAP Success with a fresh identifier on every
/// EAPOL-Start").
fn emit_canned_on_start(port: &mut Port) -> bool {
    if !port.eapol_start_received {
        return false;
    }
    let code = match port.pae_state {
        AuthPaeState::ForceAuth => EapCode::Success,
        AuthPaeState::ForceUnauth => EapCode::Failure,
        _ => return false,
    };
    port.eapol_start_received = false;
    port.current_id = Some(next_id(port.current_id));
    port.tx_eap_packet = Some(build_canned(code, port.current_id.unwrap()));
    port.stats.eapol_req_frames_tx += 1;
    true
}

fn global_transition(port: &Port) -> Option<AuthPaeState> {
    if port.initialize || !port.port_enabled {
        return Some(AuthPaeState::Initialize);
    }
    match port.config.port_control {
        PortControl::ForceAuth if port.pae_state != AuthPaeState::ForceAuth => {
            Some(AuthPaeState::ForceAuth)
        }
        PortControl::ForceUnauth if port.pae_state != AuthPaeState::ForceUnauth => {
            Some(AuthPaeState::ForceUnauth)
        }
        _ => None,
    }
}

fn state_transition(port: &mut Port) -> AuthPaeState {
    use crate::state::BackendAuthState as Backend;

    match port.pae_state {
        AuthPaeState::Initialize => AuthPaeState::Disconnected,
        AuthPaeState::Disconnected if port.eapol_start_received => AuthPaeState::Connecting,
        AuthPaeState::Connecting if port.backend_state == Backend::Idle => {
            AuthPaeState::Authenticating
        }
        AuthPaeState::Authenticating if port.backend_state == Backend::Success => {
            AuthPaeState::Authenticated
        }
        AuthPaeState::Authenticating if port.backend_state == Backend::Fail => {
            AuthPaeState::Held
        }
        AuthPaeState::Authenticating if port.backend_state == Backend::Timeout => {
            AuthPaeState::Aborting
        }
        AuthPaeState::Authenticating if port.eapol_start_received || port.eapol_logoff_received => {
            AuthPaeState::Aborting
        }
        AuthPaeState::Authenticated if port.eapol_start_received => AuthPaeState::Connecting,
        AuthPaeState::Authenticated if port.eapol_logoff_received || port.reauthenticate => {
            AuthPaeState::Restart
        }
        AuthPaeState::Aborting => AuthPaeState::Disconnected,
        AuthPaeState::Held if port.quiet_while == 0 => AuthPaeState::Disconnected,
        AuthPaeState::Restart => AuthPaeState::Connecting,
        other => other,
    }
}

fn on_entry(port: &mut Port, from: AuthPaeState, to: AuthPaeState) {
    match to {
        AuthPaeState::Initialize => {
            port.initialize = false;
            port.reauth_count = 0;
            set_status(port, AuthPortStatus::Unauthorized, terminate_cause(from, to));
        }
        AuthPaeState::Connecting => {
            port.reauth_count += 1;
            port.eapol_start_received = false;
            if port.reauth_count > port.config.re_auth_max {
                port.pae_state = AuthPaeState::Disconnected;
                set_status(
                    port,
                    AuthPortStatus::Unauthorized,
                    Some(SessionTerminateCause::ReauthFailed),
                );
            }
        }
        AuthPaeState::Authenticated => {
            set_status(
                port,
                AuthPortStatus::Authorized,
                Some(SessionTerminateCause::NotTerminatedYet),
            );
        }
        AuthPaeState::Aborting | AuthPaeState::Disconnected => {
            let cause = if port.eapol_logoff_received {
                Some(SessionTerminateCause::SupplicantLogoff)
            } else {
                Some(SessionTerminateCause::PortFailure)
            };
            port.eapol_logoff_received = false;
            port.eapol_start_received = false;
            set_status(port, AuthPortStatus::Unauthorized, cause);
        }
        AuthPaeState::Held => {
            port.quiet_while = u32::from(port.config.quiet_period_secs);
            set_status(port, AuthPortStatus::Unauthorized, None);
        }
        AuthPaeState::Restart => {
            port.reauthenticate = false;
            set_status(
                port,
                port.auth_port_status,
                Some(SessionTerminateCause::SupplicantRestart),
            );
        }
        AuthPaeState::ForceAuth => {
            set_status(
                port,
                AuthPortStatus::Authorized,
                Some(SessionTerminateCause::NotTerminatedYet),
            );
        }
        AuthPaeState::ForceUnauth => {
            set_status(
                port,
                AuthPortStatus::Unauthorized,
                Some(SessionTerminateCause::AuthControlForceUnauth),
            );
        }
        AuthPaeState::Authenticating | AuthPaeState::Connecting => {}
    }
}

fn set_status(port: &mut Port, status: AuthPortStatus, cause: Option<SessionTerminateCause>) {
    port.auth_port_status = status;
    if let Some(cause) = cause {
        port.session.session_terminate_cause = Some(cause);
    }
}

fn terminate_cause(_from: AuthPaeState, _to: AuthPaeState) -> Option<SessionTerminateCause> {
    Some(SessionTerminateCause::PortFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot1x_types::config::PortConfig;
    use dot1x_types::mac::MacAddr;

    fn port_with_control(control: PortControl) -> Port {
        let mut config = PortConfig::default();
        config.port_control = control;
        let mut port = Port::new(0, MacAddr([0; 6]), config);
        port.initialize = false;
        port
    }

    #[test]
    fn force_auth_sends_canned_success_on_start() {
        let mut port = port_with_control(PortControl::ForceAuth);
        step(&mut port); // settle into FORCE_AUTH
        port.eapol_start_received = true;
        step(&mut port);

        assert_eq!(port.auth_port_status, AuthPortStatus::Authorized);
        let frame = port.tx_eap_packet.take().unwrap();
        assert_eq!(frame[0], 3); // EAP code Success
    }

    #[test]
    fn force_unauth_sends_canned_failure_on_start() {
        let mut port = port_with_control(PortControl::ForceUnauth);
        step(&mut port);
        port.eapol_start_received = true;
        step(&mut port);

        assert_eq!(port.auth_port_status, AuthPortStatus::Unauthorized);
        let frame = port.tx_eap_packet.take().unwrap();
        assert_eq!(frame[0], 4); // EAP code Failure
    }

    #[test]
    fn authenticating_backend_fail_enters_held_with_quiet_period() {
        use crate::state::BackendAuthState;

        let mut port = port_with_control(PortControl::Auto);
        port.config.quiet_period_secs = 60;
        step(&mut port); // INITIALIZE -> DISCONNECTED
        port.eapol_start_received = true;
        step(&mut port); // DISCONNECTED -> CONNECTING
        port.backend_state = BackendAuthState::Idle;
        step(&mut port); // CONNECTING -> AUTHENTICATING
        port.backend_state = BackendAuthState::Fail;
        step(&mut port); // AUTHENTICATING -> HELD

        assert_eq!(port.pae_state, AuthPaeState::Held);
        assert_eq!(port.auth_port_status, AuthPortStatus::Unauthorized);
        assert_eq!(port.quiet_while, 60);
    }

    #[test]
    fn connecting_past_reauth_max_returns_to_disconnected_with_reauth_failed_cause() {
        let mut port = port_with_control(PortControl::Auto);
        step(&mut port); // INITIALIZE -> DISCONNECTED
        port.config.re_auth_max = 0;
        port.eapol_start_received = true;
        step(&mut port); // DISCONNECTED -> CONNECTING -> reauth_count(1) > 0 -> DISCONNECTED

        assert_eq!(port.pae_state, AuthPaeState::Disconnected);
        assert_eq!(
            port.session.session_terminate_cause,
            Some(SessionTerminateCause::ReauthFailed)
        );
    }
}
