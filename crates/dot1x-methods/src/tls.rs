//! EAP-TLS (spec.md §1: "the TLS stack used by EAP-TLS" is an external
//! collaborator; this module owns only the fragmentation envelope around
//! it, grounded on `eap_tls.c`'s flag handling and RFC 5216 §2.1.5/§3.2).

use crate::{EapMethod, MethodOutcome};
use byteorder::{BigEndian, ByteOrder};
use dot1x_types::eap::{Decision, EapType, MethodState};

/// Start flag: set only on the server's EAP-TLS start message.
const FLAG_START: u8 = 0x20;
/// More-fragments flag: set on every fragment but the last.
const FLAG_MORE_FRAGMENTS: u8 = 0x40;
/// Length-included flag: set on the first fragment of a fragmented message,
/// adding a 4-byte total-length field immediately after the flags byte.
const FLAG_LENGTH_INCLUDED: u8 = 0x80;

/// The actual TLS handshake engine, out of scope for this crate
/// (spec.md §1). Implementations drive a real TLS stack; this trait only
/// describes the byte-level interface the fragmentation layer calls
/// through.
pub trait TlsChannel: Send + Sync {
    /// Starts (or restarts) the handshake, returning the first chunk of
    /// handshake bytes to send (e.g. ClientHello).
    fn start(&mut self) -> Vec<u8>;

    /// Feeds a complete, reassembled TLS record (or set of records) from
    /// the peer and returns the next chunk of handshake bytes to send, if
    /// the handshake is not yet complete.
    fn advance(&mut self, received: &[u8]) -> Option<Vec<u8>>;

    /// Reports whether the handshake has finished successfully.
    fn is_established(&self) -> bool;
}

/// Fragment-reassembly state for one EAP-TLS method instance (spec.md
/// §3, §9: "a bidirectional fragment-reassembly buffer pair ... with
/// explicit read/write cursors").
#[derive(Default)]
struct FragmentBuffers {
    /// Bytes received so far for the message currently being reassembled.
    rx: Vec<u8>,
    /// Total length declared by the peer's Length-included fragment, if any.
    rx_expected_len: Option<u32>,
    /// Bytes still to be sent from the current outbound message.
    tx: Vec<u8>,
    tx_cursor: usize,
}

impl FragmentBuffers {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// EAP-TLS responder. The handshake itself is delegated to a
/// [`TlsChannel`]; this type only manages fragment reassembly and
/// re-fragmentation against `fragment_size`.
pub struct TlsMethod<T: TlsChannel> {
    channel: T,
    fragments: FragmentBuffers,
    fragment_size: usize,
}

impl<T: TlsChannel> TlsMethod<T> {
    /// Creates a method instance. `fragment_size` caps each outbound
    /// fragment's TLS-data length (spec.md §4.8: "Framed-MTU=1000 (the
    /// EAP fragment cap)").
    #[must_use]
    pub fn new(channel: T, fragment_size: usize) -> Self {
        Self {
            channel,
            fragments: FragmentBuffers::default(),
            fragment_size,
        }
    }

    fn next_outbound_fragment(&mut self) -> Vec<u8> {
        let total_len = self.fragments.tx.len();
        let remaining = total_len - self.fragments.tx_cursor;
        let chunk_len = remaining.min(self.fragment_size);
        let is_first = self.fragments.tx_cursor == 0;
        let chunk = &self.fragments.tx[self.fragments.tx_cursor..self.fragments.tx_cursor + chunk_len];

        let more = self.fragments.tx_cursor + chunk_len < total_len;

        let mut flags = 0u8;
        if more {
            flags |= FLAG_MORE_FRAGMENTS;
        }
        if is_first && more {
            flags |= FLAG_LENGTH_INCLUDED;
        }

        let mut out = vec![flags];
        if is_first && more {
            let mut len_bytes = [0u8; 4];
            BigEndian::write_u32(&mut len_bytes, total_len as u32);
            out.extend_from_slice(&len_bytes);
        }
        out.extend_from_slice(chunk);

        self.fragments.tx_cursor += chunk_len;
        out
    }
}

impl<T: TlsChannel> EapMethod for TlsMethod<T> {
    fn method_type(&self) -> EapType {
        EapType::Tls
    }

    fn check(&self, request_type_data: &[u8]) -> bool {
        let Some(&flags) = request_type_data.first() else {
            return false;
        };
        if flags & FLAG_LENGTH_INCLUDED != 0 {
            request_type_data.len() >= 1 + 4
        } else {
            true
        }
    }

    fn process(&mut self, _identifier: u8, request_type_data: &[u8]) -> MethodOutcome {
        let flags = request_type_data[0];
        let mut offset = 1;

        if flags & FLAG_LENGTH_INCLUDED != 0 {
            self.fragments.rx_expected_len = Some(BigEndian::read_u32(&request_type_data[1..5]));
            offset += 4;
        }

        if flags & FLAG_START != 0 {
            self.fragments.reset();
            let first_chunk = self.channel.start();
            self.fragments.tx = first_chunk;
            self.fragments.tx_cursor = 0;
            return MethodOutcome {
                method_state: MethodState::Cont,
                decision: Decision::Fail,
                response_type_data: self.next_outbound_fragment(),
            };
        }

        self.fragments.rx.extend_from_slice(&request_type_data[offset..]);

        if flags & FLAG_MORE_FRAGMENTS != 0 {
            // Acknowledge this fragment with an empty EAP-Response; the
            // server sends the next fragment on the following request.
            return MethodOutcome {
                method_state: MethodState::Cont,
                decision: Decision::Fail,
                response_type_data: vec![0],
            };
        }

        // Last fragment of an inbound message: hand the reassembled
        // record to the TLS channel and queue whatever it wants sent next.
        let received = std::mem::take(&mut self.fragments.rx);
        self.fragments.rx_expected_len = None;

        match self.channel.advance(&received) {
            Some(next) => {
                self.fragments.tx = next;
                self.fragments.tx_cursor = 0;
                MethodOutcome {
                    method_state: MethodState::Cont,
                    decision: Decision::Fail,
                    response_type_data: self.next_outbound_fragment(),
                }
            }
            None if self.channel.is_established() => MethodOutcome {
                method_state: MethodState::Done,
                decision: Decision::CondSucc,
                response_type_data: vec![0],
            },
            None => MethodOutcome {
                method_state: MethodState::Done,
                decision: Decision::Fail,
                response_type_data: vec![0],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedChannel {
        steps: std::collections::VecDeque<Option<Vec<u8>>>,
        established: bool,
    }

    impl TlsChannel for ScriptedChannel {
        fn start(&mut self) -> Vec<u8> {
            b"client-hello".to_vec()
        }

        fn advance(&mut self, _received: &[u8]) -> Option<Vec<u8>> {
            match self.steps.pop_front() {
                Some(step) => step,
                None => {
                    self.established = true;
                    None
                }
            }
        }

        fn is_established(&self) -> bool {
            self.established
        }
    }

    #[test]
    fn start_message_triggers_client_hello_fragment() {
        let channel = ScriptedChannel {
            steps: Default::default(),
            established: false,
        };
        let mut method = TlsMethod::new(channel, 1000);
        let outcome = method.process(1, &[FLAG_START]);
        assert_eq!(outcome.method_state, MethodState::Cont);
        assert_eq!(&outcome.response_type_data[1..], b"client-hello");
    }

    #[test]
    fn large_outbound_message_is_fragmented_with_length_and_more_flags() {
        let channel = ScriptedChannel {
            steps: Default::default(),
            established: false,
        };
        let mut method = TlsMethod::new(channel, 4);
        method.fragments.tx = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
        method.fragments.tx_cursor = 0;

        let first = method.next_outbound_fragment();
        assert_eq!(first[0], FLAG_MORE_FRAGMENTS | FLAG_LENGTH_INCLUDED);
        assert_eq!(BigEndian::read_u32(&first[1..5]), 9);
        assert_eq!(&first[5..], &[1, 2, 3, 4]);

        let second = method.next_outbound_fragment();
        assert_eq!(second[0], FLAG_MORE_FRAGMENTS);
        assert_eq!(&second[1..], &[5, 6, 7, 8]);

        let third = method.next_outbound_fragment();
        assert_eq!(third[0], 0);
        assert_eq!(&third[1..], &[9]);
    }

    #[test]
    fn reassembles_fragmented_inbound_message_before_advancing() {
        let channel = ScriptedChannel {
            steps: vec![None].into(),
            established: false,
        };
        let mut method = TlsMethod::new(channel, 1000);

        let first = method.process(1, &[FLAG_MORE_FRAGMENTS, 1, 2]);
        assert_eq!(first.method_state, MethodState::Cont);

        let last = method.process(2, &[0, 3, 4]);
        assert_eq!(last.method_state, MethodState::Done);
        assert_eq!(last.decision, Decision::CondSucc);
    }

    #[test]
    fn check_requires_four_length_bytes_when_length_included_is_set() {
        let channel = ScriptedChannel {
            steps: Default::default(),
            established: false,
        };
        let method = TlsMethod::new(channel, 1000);
        assert!(!method.check(&[FLAG_LENGTH_INCLUDED, 0, 0]));
        assert!(method.check(&[FLAG_LENGTH_INCLUDED, 0, 0, 0, 10]));
    }
}
