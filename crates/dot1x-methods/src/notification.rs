//! EAP-Notification (spec.md §4.2, peer FSM `NOTIFICATION` state).

use crate::{EapMethod, MethodOutcome};
use dot1x_types::eap::{Decision, EapType, MethodState};

/// Logs the server's human-readable notification and answers with an
/// empty EAP-Response/Notification.
#[derive(Default)]
pub struct NotificationMethod;

impl EapMethod for NotificationMethod {
    fn method_type(&self) -> EapType {
        EapType::Notification
    }

    fn check(&self, _request_type_data: &[u8]) -> bool {
        true
    }

    fn process(&mut self, _identifier: u8, request_type_data: &[u8]) -> MethodOutcome {
        if let Ok(message) = std::str::from_utf8(request_type_data) {
            tracing::info!(message, "received EAP notification");
        } else {
            tracing::info!(bytes = request_type_data.len(), "received EAP notification (non-UTF-8)");
        }

        MethodOutcome {
            method_state: MethodState::Done,
            decision: Decision::Fail,
            response_type_data: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responds_with_empty_type_data() {
        let mut method = NotificationMethod;
        let outcome = method.process(1, b"Password will expire soon");
        assert!(outcome.response_type_data.is_empty());
    }
}
