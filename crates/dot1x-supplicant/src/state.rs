//! FSM state enumerations for the supplicant side (spec.md §4.2, §4.7,
//! §9: "enumerate instead of bit-flag booleans").

/// Supplicant PAE FSM states (802.1X-2004 Supplicant PAE, spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplicantPaeState {
    /// Not yet entered; used only before the first fixpoint pass.
    Disconnected,
    Logoff,
    Connecting,
    Authenticating,
    Authenticated,
    Held,
    Restart,
    SForceAuth,
    SForceUnauth,
}

/// Supplicant backend FSM states (spec.md §4.7: "mirrors the
/// authenticator backend but from the peer's perspective").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplicantBackendState {
    Initialize,
    Idle,
    Request,
    Response,
    Receive,
    Fail,
    Timeout,
    Success,
}

/// EAP peer FSM states (RFC 4137 §4, spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EapPeerState {
    Disabled,
    Initialize,
    Idle,
    Received,
    Method,
    GetMethod,
    Identity,
    Notification,
    Retransmit,
    Discard,
    SendResponse,
    Success,
    Failure,
}
