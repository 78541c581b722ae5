//! Backend-authentication FSM (802.1X-2004 §8.2.5, spec.md §4.5).
//!
//! This FSM is the thin relay between the wire (the supplicant, via
//! EAPOL) and the EAP full-authenticator FSM's request/response data. It
//! restarts to `IDLE` whenever the full-authenticator FSM begins a new
//! pass-through attempt (`InitializePassthrough`), which is how a fresh
//! reauthentication gets a clean backend cycle without waiting for a
//! link-level `initialize`.

use crate::port::Port;
use crate::state::{BackendAuthState, EapFullState};

/// Runs one step of the backend-authentication FSM.
pub fn step(port: &mut Port) -> bool {
    let previous = port.backend_state;

    let next = if port.initialize
        || !port.port_enabled
        || port.eap_full_state == EapFullState::InitializePassthrough
    {
        BackendAuthState::Initialize
    } else {
        state_transition(port)
    };

    if next != previous {
        port.backend_state = next;
        on_entry(port, next);
    }

    next != previous
}

fn state_transition(port: &mut Port) -> BackendAuthState {
    match port.backend_state {
        BackendAuthState::Initialize => BackendAuthState::Idle,
        BackendAuthState::Idle if port.aaa_eap_req => BackendAuthState::Request,
        BackendAuthState::Request if port.a_while == 0 => BackendAuthState::Timeout,
        BackendAuthState::Request if response_pending(port) => BackendAuthState::Response,
        BackendAuthState::Response => BackendAuthState::Idle,
        BackendAuthState::Idle
            if matches!(
                port.eap_full_state,
                EapFullState::Success | EapFullState::Success2
            ) =>
        {
            BackendAuthState::Success
        }
        BackendAuthState::Idle
            if matches!(
                port.eap_full_state,
                EapFullState::Failure | EapFullState::Failure2
            ) =>
        {
            BackendAuthState::Fail
        }
        BackendAuthState::Idle
            if matches!(
                port.eap_full_state,
                EapFullState::TimeoutFailure | EapFullState::TimeoutFailure2
            ) =>
        {
            BackendAuthState::Timeout
        }
        other => other,
    }
}

fn response_pending(port: &Port) -> bool {
    port.rx_eap_type_data.is_some() && port.rx_eap_code_is_response
}

fn on_entry(port: &mut Port, state: BackendAuthState) {
    match state {
        BackendAuthState::Request => {
            port.aaa_eap_req = false;
            port.stats.eapol_req_frames_tx += 1;
        }
        BackendAuthState::Response => {
            port.a_while = u32::from(port.config.server_timeout_secs);
            // Hand the response up to the EAP-full FSM.
            port.aaa_eap_response = port.rx_eap_type_data.take();
            port.rx_eap_code_is_response = false;
        }
        BackendAuthState::Initialize
        | BackendAuthState::Idle
        | BackendAuthState::Ignore
        | BackendAuthState::Fail
        | BackendAuthState::Timeout
        | BackendAuthState::Success => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot1x_types::config::PortConfig;
    use dot1x_types::mac::MacAddr;

    fn fresh_port() -> Port {
        let mut port = Port::new(0, MacAddr([0; 6]), PortConfig::default());
        port.initialize = false;
        port.eap_full_state = EapFullState::Idle2;
        step(&mut port); // settle Initialize -> Idle
        port
    }

    #[test]
    fn idle_to_request_on_pending_eap_request() {
        let mut port = fresh_port();
        port.aaa_eap_req = true;
        step(&mut port);
        assert_eq!(port.backend_state, BackendAuthState::Request);
        assert!(!port.aaa_eap_req);
    }

    #[test]
    fn request_to_response_on_supplicant_reply() {
        let mut port = fresh_port();
        port.aaa_eap_req = true;
        step(&mut port); // -> Request
        port.rx_eap_type_data = Some(vec![1, 2, 3]);
        port.rx_eap_code_is_response = true;
        step(&mut port); // -> Response
        assert_eq!(port.backend_state, BackendAuthState::Response);
        assert_eq!(port.aaa_eap_response, Some(vec![1, 2, 3]));
        assert_eq!(port.a_while, port.config.server_timeout_secs as u32);
    }

    #[test]
    fn request_times_out_when_a_while_reaches_zero() {
        let mut port = fresh_port();
        port.aaa_eap_req = true;
        step(&mut port); // -> Request
        port.a_while = 0;
        step(&mut port);
        assert_eq!(port.backend_state, BackendAuthState::Timeout);
    }
}
