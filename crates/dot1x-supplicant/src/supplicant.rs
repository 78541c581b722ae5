//! Supplicant state (spec.md §3 "Supplicant context"), the unit of
//! authentication on the peer side — flattened to a single port, the way
//! the source keeps one of these per interface.

use crate::state::{EapPeerState, SupplicantBackendState, SupplicantPaeState};
use dot1x_methods::EapMethod;
use dot1x_types::config::SupplicantConfig;
use dot1x_types::eap::{Decision, EapType, MethodState};
use dot1x_types::mac::MacAddr;
use dot1x_types::stats::{AuthPortStatus, PortControl, PortStats, SessionStats, SessionTerminateCause};
use std::collections::HashMap;

/// One supplicant instance and everything its three FSMs need to drive it.
pub struct Supplicant {
    /// This interface's MAC (source address on every outbound EAPOL frame).
    pub mac: MacAddr,
    /// Policy/timer configuration.
    pub config: SupplicantConfig,
    /// Locally acceptable EAP methods, keyed by wire type, in preference
    /// order for Nak construction (spec.md §4.2: "GET_METHOD ... Legacy-Nak
    /// response listing locally-acceptable methods in order").
    pub methods: HashMap<EapType, Box<dyn EapMethod>>,
    pub method_order: Vec<EapType>,

    /// Link-level `portEnabled`.
    pub port_enabled: bool,
    /// Whether the network link is 802.1X-unaware and should be treated
    /// as authorized after exhausting `maxStart` (spec.md §4.7).
    pub port_valid: bool,
    /// Administrative override, independent of EAP outcome.
    pub port_control: PortControl,
    /// User-initiated logoff; sticky until cleared by management.
    pub logoff: bool,
    /// Forces the EAP peer FSM back to `INITIALIZE` (self-clearing).
    pub eap_restart: bool,

    pub pae_state: SupplicantPaeState,
    pub backend_state: SupplicantBackendState,
    pub peer_state: EapPeerState,

    pub auth_port_status: AuthPortStatus,

    /// `startWhen` countdown, seconds.
    pub start_when: u32,
    /// EAPOL-Start attempts since the last `CONNECTING` entry.
    pub start_count: u32,
    /// `heldWhile` countdown, seconds.
    pub held_while: u32,
    /// `authWhile` countdown, seconds (supplicant backend).
    pub auth_while: u32,
    /// `idleWhile` countdown, seconds (EAP peer FSM).
    pub idle_while: u32,

    /// `lastId`: `None` is the sentinel "none".
    pub last_id: Option<u8>,
    /// Latched response type-data, resent verbatim on `RETRANSMIT`.
    pub last_resp_data: Vec<u8>,
    /// Wire type tag for `last_resp_data` (`None` only before the first
    /// response is ever built).
    pub last_resp_type: Option<EapType>,
    pub selected_method: Option<EapType>,
    pub method_state: MethodState,
    pub decision: Decision,

    /// Classification of the most recently arrived EAP packet (spec.md
    /// §4.2: "On each packet the parser classifies it"), set on arrival
    /// and cleared once consumed.
    pub rx_req: bool,
    pub rx_success: bool,
    pub rx_failure: bool,
    pub req_id: u8,
    pub req_method: Option<EapType>,
    /// Type-data of the current request, valid only while `rx_req`.
    pub rx_type_data: Vec<u8>,

    /// Transmit buffer: the next EAPOL-encapsulated payload to send.
    pub tx_eap_packet: Option<Vec<u8>>,
    /// Pending EAPOL-Start / EAPOL-Logoff control frames.
    pub send_start: bool,
    pub send_logoff: bool,

    /// Set when the supplicant backend FSM reaches a terminal state,
    /// consumed by the PAE FSM then cleared.
    pub auth_success: bool,
    pub auth_fail: bool,
    pub auth_timeout: bool,

    pub stats: PortStats,
    pub session: SessionStats,
}

impl Supplicant {
    /// Creates a supplicant at its power-on default (spec.md §3
    /// "Lifecycle"): driven into `DISCONNECTED` by the FSM engine.
    #[must_use]
    pub fn new(mac: MacAddr, config: SupplicantConfig) -> Self {
        let mut session = SessionStats::default();
        session.session_terminate_cause = Some(SessionTerminateCause::PortFailure);

        Self {
            mac,
            config,
            methods: HashMap::new(),
            method_order: Vec::new(),
            port_enabled: true,
            port_valid: true,
            port_control: PortControl::Auto,
            logoff: false,
            eap_restart: true,
            pae_state: SupplicantPaeState::Disconnected,
            backend_state: SupplicantBackendState::Initialize,
            peer_state: EapPeerState::Disabled,
            auth_port_status: AuthPortStatus::Unauthorized,
            start_when: 0,
            start_count: 0,
            held_while: 0,
            auth_while: 0,
            idle_while: 0,
            last_id: None,
            last_resp_data: Vec::new(),
            last_resp_type: None,
            selected_method: None,
            method_state: MethodState::None,
            decision: Decision::Fail,
            rx_req: false,
            rx_success: false,
            rx_failure: false,
            req_id: 0,
            req_method: None,
            rx_type_data: Vec::new(),
            tx_eap_packet: None,
            send_start: false,
            send_logoff: false,
            auth_success: false,
            auth_fail: false,
            auth_timeout: false,
            stats: PortStats::default(),
            session,
        }
    }

    /// Registers a method, keeping `method_order` as the Nak preference
    /// list (spec.md §4.2: "listing locally-acceptable methods in order").
    pub fn register_method(&mut self, method: Box<dyn EapMethod>) {
        let method_type = method.method_type();
        self.method_order.push(method_type);
        self.methods.insert(method_type, method);
    }
}
