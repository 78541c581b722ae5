//! Per-port state (spec.md §3 "Port" / "Authenticator context"), the
//! authenticator's unit of authentication.

use crate::state::{AuthPaeState, BackendAuthState, EapFullState, ReauthTimerState};
use dot1x_types::config::PortConfig;
use dot1x_types::eap::{Decision, MethodState};
use dot1x_types::mac::MacAddr;
use dot1x_types::stats::{AuthPortStatus, PortStats, SessionStats, SessionTerminateCause};

/// One switched port and everything the four authenticator FSMs need to
/// drive it (spec.md §3: "per-port variables").
pub struct Port {
    /// Stable index, used for `NAS-Port` and per-port MAC derivation.
    pub index: u32,
    /// This port's unique source MAC (`ifMac + portIndex`).
    pub mac: MacAddr,
    /// Administrative + tunable configuration.
    pub config: PortConfig,

    /// Link-level `portEnabled` (spec.md §5: "link-state polling").
    pub port_enabled: bool,
    /// Management-triggered full reinitialization (self-clearing).
    pub initialize: bool,
    /// Management- or timer-triggered reauthentication (self-clearing).
    pub reauthenticate: bool,
    /// `portMode` mirrors `authPortStatus`; kept distinct because the
    /// global guards compare against it rather than the status directly.
    pub port_mode_auto: bool,

    pub pae_state: AuthPaeState,
    pub backend_state: BackendAuthState,
    pub reauth_timer_state: ReauthTimerState,
    pub eap_full_state: EapFullState,
    /// One-shot flags so each FSM's `INITIALIZE` entry action runs at
    /// least once even though the constructed default already sits in
    /// that same state (spec.md §9 "global-transition precedence").
    pub pae_primed: bool,
    pub reauth_primed: bool,

    pub auth_port_status: AuthPortStatus,

    /// Count of CONNECTING attempts since the last DISCONNECTED.
    pub reauth_count: u32,
    /// `quietWhile` countdown, seconds (HELD).
    pub quiet_while: u32,
    /// `reAuthWhen` countdown, seconds (reauth timer).
    pub reauth_when: u32,
    /// `aWhile` countdown, seconds (backend REQUEST/RESPONSE).
    pub a_while: u32,
    /// `retransWhile` countdown, seconds (EAP full FSM IDLE/IDLE2).
    pub retrans_while: u32,
    /// EAP retransmit attempt counter.
    pub retrans_count: u32,

    /// `currentId`: `None` is the sentinel "none".
    pub current_id: Option<u8>,
    pub method_state: MethodState,
    pub decision: Decision,

    /// Supplicant's MAC, learned from the first EAPOL frame on this port.
    pub supplicant_mac: Option<MacAddr>,
    /// Supplicant's claimed identity (from EAP-Response/Identity).
    pub identity: Option<Vec<u8>>,

    /// Whether an EAPOL-Start or EAPOL-Logoff arrived since the last
    /// fixpoint pass (consumed then cleared).
    pub eapol_start_received: bool,
    pub eapol_logoff_received: bool,
    /// A decoded EAP packet (request or response) from the peer, pending
    /// dispatch (consumed then cleared).
    pub rx_eap_type_data: Option<Vec<u8>>,
    pub rx_eap_code_is_response: bool,
    /// Transmit buffer: the next EAP packet to hand to the link layer.
    pub tx_eap_packet: Option<Vec<u8>>,

    /// Set once an Access-Request is in flight awaiting a reply.
    pub aaa_req_id: Option<u8>,
    pub aaa_req_authenticator: [u8; 16],
    pub aaa_req_eap_packet: Vec<u8>,
    /// RADIUS `State` attribute echoed from the last Access-Challenge.
    pub server_state: Vec<u8>,
    pub aaa_retrans_count: u32,
    pub aaa_success: bool,
    pub aaa_fail: bool,
    pub aaa_timeout: bool,
    pub aaa_eap_req: bool,
    pub aaa_eap_no_req: bool,
    pub aaa_eap_response: Option<Vec<u8>>,

    pub stats: PortStats,
    pub session: SessionStats,
}

impl Port {
    /// Creates a port at its power-on default (spec.md §3 "Lifecycle":
    /// `portControl = ForceAuth`, `sessionTerminateCause = PortFailure`).
    #[must_use]
    pub fn new(index: u32, mac: MacAddr, config: PortConfig) -> Self {
        let mut session = SessionStats::default();
        session.session_terminate_cause = Some(SessionTerminateCause::PortFailure);

        Self {
            index,
            mac,
            config,
            port_enabled: true,
            initialize: true,
            reauthenticate: false,
            port_mode_auto: false,
            pae_state: AuthPaeState::Initialize,
            backend_state: BackendAuthState::Initialize,
            reauth_timer_state: ReauthTimerState::Initialize,
            eap_full_state: EapFullState::Initialize,
            pae_primed: false,
            reauth_primed: false,
            auth_port_status: AuthPortStatus::Unauthorized,
            reauth_count: 0,
            quiet_while: 0,
            reauth_when: 0,
            a_while: 0,
            retrans_while: 0,
            retrans_count: 0,
            current_id: None,
            method_state: MethodState::None,
            decision: Decision::Fail,
            supplicant_mac: None,
            identity: None,
            eapol_start_received: false,
            eapol_logoff_received: false,
            rx_eap_type_data: None,
            rx_eap_code_is_response: false,
            tx_eap_packet: None,
            aaa_req_id: None,
            aaa_req_authenticator: [0u8; 16],
            aaa_req_eap_packet: Vec::new(),
            server_state: Vec::new(),
            aaa_retrans_count: 0,
            aaa_success: false,
            aaa_fail: false,
            aaa_timeout: false,
            aaa_eap_req: false,
            aaa_eap_no_req: false,
            aaa_eap_response: None,
            stats: PortStats::default(),
            session,
        }
    }

    /// True iff the EAP-full FSM has an outstanding Access-Request with
    /// no response yet (spec.md §4.9: "a port whose EAP-full FSM is in
    /// AAA_IDLE, has no pending response").
    #[must_use]
    pub fn awaiting_radius_reply(&self) -> bool {
        matches!(self.eap_full_state, EapFullState::AaaIdle) && self.aaa_req_id.is_some()
    }
}
