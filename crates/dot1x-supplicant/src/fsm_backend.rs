//! Supplicant backend FSM (spec.md §4.7).
//!
//! A simplified rendition grounded directly in spec.md's prose rather than
//! 802.1X-2004 Clause 8.4's exact table: it arms `authWhile` once a request
//! is outstanding and translates the EAP peer FSM's own terminal states
//! into the `auth_success`/`auth_fail`/`auth_timeout` flags the supplicant
//! PAE FSM consumes.

use crate::state::{EapPeerState, SupplicantBackendState};
use crate::supplicant::Supplicant;

/// Runs one step of the supplicant backend FSM.
pub fn step(supplicant: &mut Supplicant) -> bool {
    let previous = supplicant.backend_state;

    let next = if !supplicant.port_enabled || supplicant.eap_restart {
        SupplicantBackendState::Initialize
    } else {
        state_transition(supplicant)
    };

    if next != previous {
        supplicant.backend_state = next;
        on_entry(supplicant, next);
    }

    next != previous
}

fn state_transition(supplicant: &Supplicant) -> SupplicantBackendState {
    use SupplicantBackendState as S;
    match supplicant.backend_state {
        S::Initialize => S::Idle,
        S::Idle if matches!(supplicant.peer_state, EapPeerState::Received | EapPeerState::Method) => {
            S::Request
        }
        S::Request => S::Receive,
        S::Receive if supplicant.peer_state == EapPeerState::Success => S::Success,
        S::Receive if supplicant.peer_state == EapPeerState::Failure => S::Fail,
        S::Receive if supplicant.auth_while == 0 => S::Timeout,
        S::Receive if supplicant.peer_state == EapPeerState::Idle => S::Idle,
        other => other,
    }
}

fn on_entry(supplicant: &mut Supplicant, state: SupplicantBackendState) {
    use SupplicantBackendState as S;
    match state {
        S::Initialize => {
            supplicant.auth_success = false;
            supplicant.auth_fail = false;
            supplicant.auth_timeout = false;
        }
        S::Request => {
            supplicant.auth_while = supplicant.config.auth_period_secs;
        }
        S::Success => {
            supplicant.auth_success = true;
        }
        S::Fail => {
            supplicant.auth_fail = true;
        }
        S::Timeout => {
            supplicant.auth_timeout = true;
        }
        S::Idle | S::Receive => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot1x_types::config::SupplicantConfig;
    use dot1x_types::mac::MacAddr;

    fn fresh() -> Supplicant {
        let mut supplicant = Supplicant::new(MacAddr([0; 6]), SupplicantConfig::default());
        supplicant.eap_restart = false;
        step(&mut supplicant); // Initialize -> Idle
        supplicant
    }

    #[test]
    fn settles_in_idle() {
        let supplicant = fresh();
        assert_eq!(supplicant.backend_state, SupplicantBackendState::Idle);
    }

    #[test]
    fn peer_success_propagates_to_auth_success() {
        let mut supplicant = fresh();
        supplicant.peer_state = EapPeerState::Received;
        step(&mut supplicant); // Idle -> Request
        step(&mut supplicant); // Request -> Receive
        supplicant.peer_state = EapPeerState::Success;
        step(&mut supplicant);
        assert_eq!(supplicant.backend_state, SupplicantBackendState::Success);
        assert!(supplicant.auth_success);
    }

    #[test]
    fn auth_while_reaching_zero_times_out() {
        let mut supplicant = fresh();
        supplicant.peer_state = EapPeerState::Received;
        step(&mut supplicant); // Idle -> Request
        step(&mut supplicant); // Request -> Receive
        supplicant.auth_while = 0;
        step(&mut supplicant);
        assert_eq!(supplicant.backend_state, SupplicantBackendState::Timeout);
        assert!(supplicant.auth_timeout);
    }
}
