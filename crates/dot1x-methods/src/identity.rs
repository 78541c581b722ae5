//! EAP-Identity (spec.md §4.2, peer FSM `IDENTITY` state).

use crate::{EapMethod, MethodOutcome};
use dot1x_types::eap::{Decision, EapType, MethodState};

/// Answers an EAP-Request/Identity with the configured username.
pub struct IdentityMethod {
    identity: Vec<u8>,
}

impl IdentityMethod {
    /// Creates an identity responder for the given username.
    #[must_use]
    pub fn new(identity: impl Into<Vec<u8>>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

impl EapMethod for IdentityMethod {
    fn method_type(&self) -> EapType {
        EapType::Identity
    }

    fn check(&self, _request_type_data: &[u8]) -> bool {
        // Identity requests carry an optional displayable prompt; any
        // length, including empty, is acceptable.
        true
    }

    fn process(&mut self, _identifier: u8, _request_type_data: &[u8]) -> MethodOutcome {
        MethodOutcome {
            method_state: MethodState::Done,
            decision: Decision::Fail,
            response_type_data: self.identity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_configured_identity() {
        let mut method = IdentityMethod::new(b"alice".to_vec());
        let outcome = method.process(1, b"Please identify yourself");
        assert_eq!(outcome.response_type_data, b"alice".to_vec());
        assert_eq!(outcome.method_state, MethodState::Done);
    }
}
