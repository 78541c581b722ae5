//! EAP-MD5-Challenge (spec.md §4.2; RFC 3748 §5.4; grounded on
//! `eap_md5.c`'s `eapMd5CheckRequest`/`eapMd5ProcessRequest`/
//! `eapMd5BuildResponse`).

use crate::{EapMethod, MethodOutcome};
use dot1x_types::eap::{Decision, EapType, MethodState};

/// EAP-MD5-Challenge responder. Requires a non-empty password to be
/// selectable at all (spec.md §4.2: "MD5-Challenge requires a non-empty
/// password").
pub struct Md5ChallengeMethod {
    password: Vec<u8>,
}

impl Md5ChallengeMethod {
    /// Creates a responder for the given password. Returns `None` if the
    /// password is empty, since the method cannot be selected in that
    /// case.
    #[must_use]
    pub fn new(password: impl Into<Vec<u8>>) -> Option<Self> {
        let password = password.into();
        if password.is_empty() {
            None
        } else {
            Some(Self { password })
        }
    }
}

impl EapMethod for Md5ChallengeMethod {
    fn method_type(&self) -> EapType {
        EapType::Md5Challenge
    }

    fn check(&self, request_type_data: &[u8]) -> bool {
        match request_type_data.first() {
            Some(&value_size) => request_type_data.len() >= 1 + usize::from(value_size),
            None => false,
        }
    }

    fn process(&mut self, identifier: u8, request_type_data: &[u8]) -> MethodOutcome {
        let value_size = usize::from(request_type_data[0]);
        let challenge = &request_type_data[1..1 + value_size];

        let digest = dot1x_crypto::md5_challenge_response(identifier, &self.password, challenge);

        let mut response_type_data = Vec::with_capacity(1 + digest.len());
        response_type_data.push(digest.len() as u8);
        response_type_data.extend_from_slice(&digest);

        MethodOutcome {
            // The method never continues past one round trip.
            method_state: MethodState::Done,
            // We don't know the server's verdict yet, but are willing to
            // proceed if it accepts (eap_md5.c: EAP_DECISION_COND_SUCC).
            decision: Decision::CondSucc,
            response_type_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_password_less_instance() {
        assert!(Md5ChallengeMethod::new(Vec::new()).is_none());
    }

    #[test]
    fn check_rejects_truncated_challenge() {
        let method = Md5ChallengeMethod::new(b"secret".to_vec()).unwrap();
        assert!(!method.check(&[16, 1, 2, 3]));
    }

    #[test]
    fn check_accepts_well_formed_challenge() {
        let method = Md5ChallengeMethod::new(b"secret".to_vec()).unwrap();
        let mut request = vec![4u8];
        request.extend_from_slice(&[1, 2, 3, 4]);
        assert!(method.check(&request));
    }

    #[test]
    fn process_computes_md5_of_id_password_challenge() {
        let mut method = Md5ChallengeMethod::new(b"secret".to_vec()).unwrap();
        let challenge = [1u8, 2, 3, 4];
        let mut request = vec![4u8];
        request.extend_from_slice(&challenge);

        let outcome = method.process(7, &request);
        assert_eq!(outcome.method_state, MethodState::Done);
        assert_eq!(outcome.decision, Decision::CondSucc);

        let expected = dot1x_crypto::md5_challenge_response(7, b"secret", &challenge);
        assert_eq!(outcome.response_type_data[0], 16);
        assert_eq!(&outcome.response_type_data[1..], &expected);
    }
}
