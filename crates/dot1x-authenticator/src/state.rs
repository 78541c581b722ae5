//! FSM state enumerations for the authenticator side (spec.md §4.4-§4.6,
//! §9: "enumerate instead of bit-flag booleans").

/// Authenticator PAE FSM states (802.1X-2004 §8.2.4, spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPaeState {
    /// Not yet entered; used only before the first fixpoint pass.
    Initialize,
    Disconnected,
    Connecting,
    Authenticating,
    Authenticated,
    Aborting,
    Held,
    ForceAuth,
    ForceUnauth,
    Restart,
}

/// Backend-authentication FSM states (802.1X-2004 §8.2.5, spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendAuthState {
    Initialize,
    Idle,
    Request,
    Response,
    Ignore,
    Fail,
    Timeout,
    Success,
}

/// Reauthentication-timer FSM states (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReauthTimerState {
    Initialize,
    Reauthenticate,
}

/// EAP full-authenticator FSM states, both zones (RFC 4137 §5, spec.md
/// §4.3). The "local" zone issues the Identity request; every path out
/// of it leads to the "pass-through" zone, which hands method processing
/// to the AAA server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EapFullState {
    // Local zone.
    Initialize,
    Idle,
    Received,
    Nak,
    SelectAction,
    IntegrityCheck,
    MethodResponse,
    ProposeMethod,
    MethodRequest,
    Discard,
    SendRequest,
    TimeoutFailure,
    Failure,
    Success,
    Retransmit,
    // Pass-through zone.
    InitializePassthrough,
    Idle2,
    Retransmit2,
    Received2,
    AaaRequest,
    AaaIdle,
    AaaResponse,
    Discard2,
    SendRequest2,
    TimeoutFailure2,
    Failure2,
    Success2,
}

/// The full-authenticator's policy decision (RFC 4137 §4.1/§5.1),
/// evaluated in `SELECT_ACTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Continue,
    Success,
    Failure,
    Passthrough,
}
