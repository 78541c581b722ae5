//! Per-port and per-session statistics (spec.md §4.1, §9 supplement:
//! the MIB/management read surface).

use serde::{Deserialize, Serialize};

/// Administrative control mode for a port (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortControl {
    /// Forced unauthorized regardless of EAP outcome.
    ForceUnauth,
    /// Forced authorized regardless of EAP outcome.
    ForceAuth,
    /// Normal 802.1X operation.
    Auto,
}

impl Default for PortControl {
    fn default() -> Self {
        // spec.md §3 lifecycle: "A port is created at init with
        // `portControl = ForceAuth`".
        Self::ForceAuth
    }
}

/// Authorization state exposed as `authPortStatus` (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPortStatus {
    /// Port is authorized; `FORWARDING` on the switch.
    Authorized,
    /// Port is unauthorized; `BLOCKING` on the switch.
    Unauthorized,
}

/// Switch/bridge forwarding state for a port (spec.md §4.4, §4.8: the
/// switch driver's own vocabulary, one-to-one with `AuthPortStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortForwardingState {
    /// Client traffic is forwarded.
    Forwarding,
    /// Client traffic is blocked; only EAPOL reaches the CPU.
    Blocking,
}

impl From<AuthPortStatus> for PortForwardingState {
    fn from(status: AuthPortStatus) -> Self {
        match status {
            AuthPortStatus::Authorized => Self::Forwarding,
            AuthPortStatus::Unauthorized => Self::Blocking,
        }
    }
}

/// Reason the last session ended (spec.md §3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionTerminateCause {
    /// The session has not terminated yet (current session in progress).
    NotTerminatedYet,
    /// The supplicant sent EAPOL-Logoff.
    SupplicantLogoff,
    /// Link/port failure.
    PortFailure,
    /// The supplicant restarted authentication (EAPOL-Start).
    SupplicantRestart,
    /// Reauthentication failed.
    ReauthFailed,
    /// An administrator forced the port unauthorized.
    AuthControlForceUnauth,
    /// The port was reinitialized by management.
    PortReinit,
    /// The port was administratively disabled.
    PortAdminDisabled,
}

/// Per-port frame/error counters (spec.md §4.1).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PortStats {
    /// `eapolFramesRx`.
    pub eapol_frames_rx: u64,
    /// `eapolFramesTx`.
    pub eapol_frames_tx: u64,
    /// `eapolStartFramesRx`.
    pub eapol_start_frames_rx: u64,
    /// `eapolLogoffFramesRx`.
    pub eapol_logoff_frames_rx: u64,
    /// `eapolRespIdFramesRx`.
    pub eapol_resp_id_frames_rx: u64,
    /// `eapolRespFramesRx`.
    pub eapol_resp_frames_rx: u64,
    /// `eapolReqIdFramesTx`.
    pub eapol_req_id_frames_tx: u64,
    /// `eapolReqFramesTx`.
    pub eapol_req_frames_tx: u64,
    /// `invalidEapolFramesRx`.
    pub invalid_eapol_frames_rx: u64,
    /// `eapLengthErrorFramesRx`.
    pub eap_length_error_frames_rx: u64,
    /// `lastEapolFrameVersion`.
    pub last_eapol_frame_version: u8,
}

/// Per-session statistics (spec.md §3: "statistics counters").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Octets received during the session.
    pub session_octets_rx: u64,
    /// Octets transmitted during the session.
    pub session_octets_tx: u64,
    /// Frames received during the session.
    pub session_frames_rx: u64,
    /// Frames transmitted during the session.
    pub session_frames_tx: u64,
    /// Reason the session ended, or `None` before the first transition.
    pub session_terminate_cause: Option<SessionTerminateCause>,
}
