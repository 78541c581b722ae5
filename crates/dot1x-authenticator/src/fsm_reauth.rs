//! Reauthentication-timer FSM (802.1X-2004 §8.2.6, spec.md §4.6).
//!
//! Suppressed unless the port is in `AUTO` mode, currently `Authorized`,
//! reauthentication is enabled, and the port isn't mid-initialize — in
//! every other case it parks in `INITIALIZE` and never counts down.

use crate::port::Port;
use crate::state::ReauthTimerState;
use dot1x_types::stats::{AuthPortStatus, PortControl};

/// Runs one step of the reauthentication-timer FSM.
pub fn step(port: &mut Port) -> bool {
    let previous = port.reauth_timer_state;
    // `reauth_timer_state` is constructed already sitting in
    // `INITIALIZE` with `reauth_when == 0`. Without forcing a genuine
    // first entry, an unsuppressed first call would read that zero as
    // "timer expired" instead of "never armed" and fire immediately.
    let first_run = !port.reauth_primed;
    port.reauth_primed = true;

    let next = if first_run || suppressed(port) {
        ReauthTimerState::Initialize
    } else {
        state_transition(port)
    };

    if next != previous || first_run {
        port.reauth_timer_state = next;
        on_entry(port, next);
    }

    next != previous || first_run
}

fn suppressed(port: &Port) -> bool {
    port.initialize
        || !port.port_enabled
        || port.config.port_control != PortControl::Auto
        || port.auth_port_status != AuthPortStatus::Authorized
        || !port.config.re_auth_enabled
}

fn state_transition(port: &Port) -> ReauthTimerState {
    match port.reauth_timer_state {
        ReauthTimerState::Initialize if port.reauth_when == 0 => ReauthTimerState::Reauthenticate,
        other => other,
    }
}

fn on_entry(port: &mut Port, state: ReauthTimerState) {
    match state {
        ReauthTimerState::Initialize => {
            port.reauth_when = port.config.re_auth_period_secs;
        }
        ReauthTimerState::Reauthenticate => {
            port.reauthenticate = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot1x_types::config::PortConfig;
    use dot1x_types::mac::MacAddr;

    fn armed_port() -> Port {
        let mut config = PortConfig::default();
        config.port_control = PortControl::Auto;
        config.re_auth_enabled = true;
        let mut port = Port::new(0, MacAddr([0; 6]), config);
        port.initialize = false;
        port.auth_port_status = AuthPortStatus::Authorized;
        step(&mut port); // settle INITIALIZE, arm reauth_when
        port
    }

    #[test]
    fn initialize_arms_reauth_when_from_period() {
        let port = armed_port();
        assert_eq!(port.reauth_when, port.config.re_auth_period_secs);
    }

    #[test]
    fn fires_when_reauth_when_reaches_zero() {
        let mut port = armed_port();
        port.reauth_when = 0;
        step(&mut port);
        assert_eq!(port.reauth_timer_state, ReauthTimerState::Reauthenticate);
        assert!(port.reauthenticate);
    }

    #[test]
    fn suppressed_when_port_not_authorized() {
        let mut config = PortConfig::default();
        config.port_control = PortControl::Auto;
        config.re_auth_enabled = true;
        let mut port = Port::new(0, MacAddr([0; 6]), config);
        port.initialize = false;
        port.auth_port_status = AuthPortStatus::Unauthorized;
        step(&mut port);
        assert_eq!(port.reauth_timer_state, ReauthTimerState::Initialize);
        port.reauth_when = 0;
        step(&mut port);
        assert_eq!(port.reauth_timer_state, ReauthTimerState::Initialize);
    }
}
