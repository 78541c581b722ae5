//! EAP full-authenticator FSM (RFC 4137 §5, spec.md §4.3).
//!
//! The local zone's policy is deliberately minimal: it issues a single
//! EAP-Request/Identity, and `SELECT_ACTION` hands off to the
//! pass-through zone for every non-empty identity (spec.md §9 Open
//! Questions: "local-policy minimalism"). The pass-through zone then
//! relays opaque EAP bytes between the supplicant (via the backend
//! authentication FSM) and the RADIUS server (via the fields a
//! [`crate::context`] tick loop populates after a wire round trip); this
//! FSM never interprets method type-data past Identity.

use crate::port::Port;
use crate::state::{EapFullState, PolicyDecision};
use dot1x_codec::eap::{encode_eap_packet, next_id};
use dot1x_types::eap::{Decision, EapCode, EapPacket, EapType, MethodState};

/// Retransmission interval for both zones, seconds. Neither zone has a
/// method-provided timeout hint in this build, so both use the same
/// constant (802.1X-2004 default `txPeriod` is compatible with 5s).
const RETRANS_SECS: u32 = 5;

/// Runs one step of the EAP full-authenticator FSM.
pub fn step(port: &mut Port) -> bool {
    let previous = port.eap_full_state;

    let next = if port.initialize || !port.port_enabled {
        EapFullState::Initialize
    } else {
        state_transition(port)
    };

    if next != previous {
        port.eap_full_state = next;
        on_entry(port, next);
    }

    next != previous
}

fn state_transition(port: &mut Port) -> EapFullState {
    use EapFullState as S;
    match port.eap_full_state {
        S::Initialize => S::Idle,

        S::Idle if port.current_id.is_none() => S::ProposeMethod,
        S::Idle if response_waiting(port) => S::Received,
        S::Idle if port.retrans_while == 0 && port.current_id.is_some() => S::Retransmit,
        S::Idle => S::Idle,

        S::ProposeMethod => S::MethodRequest,
        S::MethodRequest => S::SendRequest,
        S::SendRequest => S::Idle,
        S::Retransmit => {
            if port.retrans_count >= port.config.max_retrans {
                S::TimeoutFailure
            } else {
                S::Idle
            }
        }
        S::TimeoutFailure => S::Failure,
        S::Failure => S::Failure,

        S::Received => S::IntegrityCheck,
        S::IntegrityCheck if integrity_ok(port) => S::MethodResponse,
        S::IntegrityCheck => S::Discard,
        S::Discard => S::Idle,
        S::MethodResponse => S::SelectAction,
        S::SelectAction => match select_action(port) {
            PolicyDecision::Continue => S::ProposeMethod,
            PolicyDecision::Success => S::Success,
            PolicyDecision::Failure => S::Failure,
            PolicyDecision::Passthrough => S::InitializePassthrough,
        },
        S::Success => S::Success,

        S::InitializePassthrough => S::Idle2,
        S::Idle2 if port.aaa_eap_response.is_some() => S::Received2,
        S::Idle2 if port.retrans_while == 0 && port.aaa_req_id.is_none() && port.current_id.is_some() => {
            S::Retransmit2
        }
        S::Idle2 => S::Idle2,
        S::Received2 => S::AaaRequest,
        S::AaaRequest => S::AaaIdle,
        S::AaaIdle if aaa_result_pending(port) => S::AaaResponse,
        S::AaaIdle => S::AaaIdle,
        S::AaaResponse => match aaa_outcome(port) {
            AaaOutcome::Challenge => S::SendRequest2,
            AaaOutcome::Success => S::Success2,
            AaaOutcome::Fail => S::Failure2,
            AaaOutcome::Timeout => S::TimeoutFailure2,
            AaaOutcome::None => S::Discard2,
        },
        S::SendRequest2 => S::Idle2,
        S::Retransmit2 => {
            if port.aaa_retrans_count >= port.config.max_retrans {
                S::TimeoutFailure2
            } else {
                S::Idle2
            }
        }
        S::TimeoutFailure2 => S::Failure2,
        S::Failure2 => S::Failure2,
        S::Success2 => S::Success2,
        S::Discard2 => S::Idle2,
    }
}

fn response_waiting(port: &Port) -> bool {
    port.rx_eap_type_data.is_some() && port.rx_eap_code_is_response
}

fn integrity_ok(port: &Port) -> bool {
    port.rx_eap_type_data.is_some()
}

fn select_action(port: &Port) -> PolicyDecision {
    match &port.identity {
        Some(identity) if !identity.is_empty() => PolicyDecision::Passthrough,
        _ => PolicyDecision::Failure,
    }
}

enum AaaOutcome {
    Challenge,
    Success,
    Fail,
    Timeout,
    None,
}

fn aaa_result_pending(port: &Port) -> bool {
    port.aaa_eap_req || port.aaa_success || port.aaa_fail || port.aaa_timeout
}

fn aaa_outcome(port: &Port) -> AaaOutcome {
    if port.aaa_eap_req {
        AaaOutcome::Challenge
    } else if port.aaa_success {
        AaaOutcome::Success
    } else if port.aaa_fail {
        AaaOutcome::Fail
    } else if port.aaa_timeout {
        AaaOutcome::Timeout
    } else {
        AaaOutcome::None
    }
}

fn on_entry(port: &mut Port, state: EapFullState) {
    use EapFullState as S;
    match state {
        S::Initialize => {
            port.current_id = None;
            port.retrans_count = 0;
            port.retrans_while = 0;
            port.method_state = MethodState::None;
            port.decision = Decision::Fail;
            port.identity = None;
        }
        S::MethodRequest => {
            port.current_id = Some(next_id(port.current_id));
            port.method_state = MethodState::Init;
        }
        S::SendRequest => {
            port.tx_eap_packet = Some(encode_identity_request(port));
            port.aaa_eap_req = true;
            port.retrans_while = RETRANS_SECS;
        }
        S::Retransmit => {
            port.retrans_count += 1;
            if port.retrans_count < port.config.max_retrans {
                port.tx_eap_packet = Some(encode_identity_request(port));
                port.aaa_eap_req = true;
                port.retrans_while = RETRANS_SECS;
            }
        }
        S::Failure => {
            port.decision = Decision::Fail;
        }
        S::IntegrityCheck => {}
        S::Discard => {
            port.rx_eap_type_data = None;
            port.rx_eap_code_is_response = false;
        }
        S::MethodResponse => {
            port.identity = port.rx_eap_type_data.take();
            port.rx_eap_code_is_response = false;
            port.method_state = MethodState::Done;
        }
        S::Success => {
            port.decision = Decision::UncondSucc;
        }

        S::InitializePassthrough => {
            port.aaa_req_id = None;
            port.aaa_req_authenticator = [0u8; 16];
            port.aaa_req_eap_packet.clear();
            port.server_state.clear();
            port.aaa_retrans_count = 0;
            port.aaa_success = false;
            port.aaa_fail = false;
            port.aaa_timeout = false;
            port.retrans_while = RETRANS_SECS;
            port.aaa_eap_response = Some(encode_identity_response(port));
        }
        S::Received2 => {
            if let Some(bytes) = port.aaa_eap_response.take() {
                port.aaa_req_eap_packet = bytes;
            }
        }
        S::AaaRequest => {}
        S::AaaResponse => {}
        S::SendRequest2 => {
            port.aaa_req_id = None;
            port.aaa_retrans_count = 0;
            port.retrans_while = RETRANS_SECS;
        }
        S::Retransmit2 => {
            port.aaa_retrans_count += 1;
            if port.aaa_retrans_count < port.config.max_retrans {
                port.aaa_eap_req = true;
                port.retrans_while = RETRANS_SECS;
            }
        }
        S::Failure2 => {
            port.decision = Decision::Fail;
        }
        S::Success2 => {
            port.decision = Decision::UncondSucc;
        }
        S::Discard2 => {
            port.aaa_eap_response = None;
        }
        S::TimeoutFailure | S::TimeoutFailure2 | S::AaaIdle | S::Idle | S::Idle2
        | S::ProposeMethod => {}
    }
}

fn encode_identity_request(port: &Port) -> Vec<u8> {
    encode_eap_packet(&EapPacket {
        code: EapCode::Request,
        identifier: port.current_id.unwrap_or(0),
        eap_type: Some(EapType::Identity),
        type_data: Vec::new(),
    })
}

fn encode_identity_response(port: &Port) -> Vec<u8> {
    encode_eap_packet(&EapPacket {
        code: EapCode::Response,
        identifier: port.current_id.unwrap_or(0),
        eap_type: Some(EapType::Identity),
        type_data: port.identity.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot1x_codec::eap::decode_eap_packet;
    use dot1x_types::config::PortConfig;
    use dot1x_types::mac::MacAddr;

    fn fresh_port() -> Port {
        let mut port = Port::new(0, MacAddr([0; 6]), PortConfig::default());
        port.initialize = false;
        port
    }

    #[test]
    fn local_zone_issues_identity_request_then_waits() {
        let mut port = fresh_port();
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        assert_eq!(port.eap_full_state, EapFullState::Idle);
        let frame = port.tx_eap_packet.clone().unwrap();
        let decoded = decode_eap_packet(&frame).unwrap();
        assert_eq!(decoded.code, EapCode::Request);
        assert_eq!(decoded.eap_type, Some(EapType::Identity));
    }

    #[test]
    fn identity_response_moves_to_passthrough() {
        let mut port = fresh_port();
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        port.rx_eap_type_data = Some(b"alice".to_vec());
        port.rx_eap_code_is_response = true;
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        assert_eq!(port.eap_full_state, EapFullState::AaaIdle);
        assert_eq!(port.identity, Some(b"alice".to_vec()));
        assert!(port.aaa_eap_response.is_none());
        let forwarded = decode_eap_packet(&port.aaa_req_eap_packet).unwrap();
        assert_eq!(forwarded.code, EapCode::Response);
        assert_eq!(forwarded.type_data, b"alice".to_vec());
    }

    #[test]
    fn empty_identity_fails_local_policy() {
        let mut port = fresh_port();
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        port.rx_eap_type_data = Some(Vec::new());
        port.rx_eap_code_is_response = true;
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        assert_eq!(port.eap_full_state, EapFullState::Failure);
    }

    #[test]
    fn passthrough_relays_challenge_to_supplicant() {
        let mut port = fresh_port();
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        port.rx_eap_type_data = Some(b"alice".to_vec());
        port.rx_eap_code_is_response = true;
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        assert_eq!(port.eap_full_state, EapFullState::AaaIdle);
        assert!(!port.aaa_req_eap_packet.is_empty());

        // Simulate the context-level glue dispatching the Access-Request
        // and then a RADIUS Access-Challenge arriving for it.
        port.aaa_req_id = Some(7);
        port.tx_eap_packet = Some(vec![1, 9, 0, 5, 4]); // EAP-Request/MD5-Challenge
        port.aaa_eap_req = true;
        step(&mut port); // AaaIdle -> AaaResponse
        step(&mut port); // AaaResponse -> SendRequest2
        step(&mut port); // SendRequest2 -> Idle2

        assert_eq!(port.eap_full_state, EapFullState::Idle2);
        assert!(port.aaa_req_id.is_none());
    }

    #[test]
    fn passthrough_access_reject_fails() {
        let mut port = fresh_port();
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        port.rx_eap_type_data = Some(b"alice".to_vec());
        port.rx_eap_code_is_response = true;
        for _ in 0..10 {
            if !step(&mut port) {
                break;
            }
        }
        port.aaa_fail = true;
        for _ in 0..5 {
            if !step(&mut port) {
                break;
            }
        }
        assert_eq!(port.eap_full_state, EapFullState::Failure2);
    }
}
