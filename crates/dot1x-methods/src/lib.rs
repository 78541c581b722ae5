//! EAP method implementations (spec.md §1, §4.2, §9 "EAP methods").
//!
//! Each method implements [`EapMethod`]'s `check`/`process` pair, following
//! the three-step `eapXxxCheckRequest` / `eapXxxProcessRequest` /
//! `eapXxxBuildResponse` shape of the reference method handlers (build is
//! folded into `process` here since every method in scope produces its
//! whole response from the same state it updates).

mod identity;
mod md5_challenge;
mod nak;
mod notification;
mod tls;

pub use identity::IdentityMethod;
pub use md5_challenge::Md5ChallengeMethod;
pub use nak::build_legacy_nak;
pub use notification::NotificationMethod;
pub use tls::{TlsChannel, TlsMethod};

use dot1x_types::eap::{Decision, EapType, MethodState};

/// Outcome of feeding one EAP request into a method (RFC 4137 §4.1:
/// `m.check`, `m.process`, `m.buildResp`).
#[derive(Debug, Clone)]
pub struct MethodOutcome {
    /// Updated `methodState`.
    pub method_state: MethodState,
    /// Updated `decision`.
    pub decision: Decision,
    /// The type-data to place in the EAP-Response (everything after the
    /// type byte). Empty if the method has nothing to send back yet.
    pub response_type_data: Vec<u8>,
}

/// A pluggable EAP authentication method (spec.md §1, §9 "EAP method").
pub trait EapMethod: Send + Sync {
    /// The method's wire type.
    fn method_type(&self) -> EapType;

    /// Validates a request's type-data before processing it. A method
    /// that rejects its own input is silently dropped by the caller
    /// (spec.md §4.2: "invokes the chosen method's `check` (silently drop
    /// if invalid)").
    fn check(&self, request_type_data: &[u8]) -> bool;

    /// Processes a validated request and builds the response.
    fn process(&mut self, identifier: u8, request_type_data: &[u8]) -> MethodOutcome;
}
