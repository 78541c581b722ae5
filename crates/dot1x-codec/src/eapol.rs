//! EAPOL frame codec and link adaptation (spec.md §4.1).

use byteorder::{BigEndian, ByteOrder};
use dot1x_types::eapol::{EapolFrame, EapolPacketType, EAPOL_ETHER_TYPE};
use dot1x_types::mac::{MacAddr, PAE_GROUP_ADDR};

/// An Ethernet II header, as carried around every EAPOL frame on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    /// Destination MAC.
    pub dst: MacAddr,
    /// Source MAC.
    pub src: MacAddr,
    /// EtherType.
    pub ether_type: u16,
}

const ETH_HEADER_LEN: usize = 14;
const EAPOL_HEADER_LEN: usize = 4;

/// Reason a received frame was dropped, for statistics purposes
/// (spec.md §4.1 lists the counters these map to).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EapolDropReason {
    /// Frame shorter than the Ethernet + EAPOL headers.
    Undersized,
    /// Destination MAC is neither the PAE group address nor our own.
    WrongDestination,
    /// EtherType is not 0x888E.
    WrongEtherType,
    /// Packet Type octet is a reserved value.
    UnknownPacketType,
    /// Declared Packet Body Length exceeds the bytes actually received.
    LengthError,
}

/// Result of attempting to decode one received Ethernet frame as EAPOL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EapolRxEvent {
    /// A well-formed EAPOL frame was decoded.
    Accepted {
        /// The Ethernet header it arrived in.
        eth: EthernetHeader,
        /// The decoded EAPOL frame, body truncated to its declared length.
        frame: EapolFrame,
    },
    /// The frame was dropped; the reason drives which counter to bump.
    Dropped(EapolDropReason),
}

/// Decodes one received Ethernet frame, applying the filtering rules of
/// spec.md §4.1: wrong destination, wrong EtherType, undersized, or a
/// Packet Body Length that doesn't fit are all dropped rather than
/// surfaced as an error (spec.md §7: "Protocol-parse errors — never
/// surfaced").
#[must_use]
pub fn decode_eapol_frame(data: &[u8], local_unicast: MacAddr) -> EapolRxEvent {
    if data.len() < ETH_HEADER_LEN + EAPOL_HEADER_LEN {
        return EapolRxEvent::Dropped(EapolDropReason::Undersized);
    }

    let dst = MacAddr([data[0], data[1], data[2], data[3], data[4], data[5]]);
    let src = MacAddr([data[6], data[7], data[8], data[9], data[10], data[11]]);
    let ether_type = BigEndian::read_u16(&data[12..14]);

    if dst != PAE_GROUP_ADDR && dst != local_unicast {
        return EapolRxEvent::Dropped(EapolDropReason::WrongDestination);
    }
    if ether_type != EAPOL_ETHER_TYPE {
        return EapolRxEvent::Dropped(EapolDropReason::WrongEtherType);
    }

    let eapol = &data[ETH_HEADER_LEN..];
    let protocol_version = eapol[0];
    let Some(packet_type) = EapolPacketType::from_u8(eapol[1]) else {
        return EapolRxEvent::Dropped(EapolDropReason::UnknownPacketType);
    };
    let body_len = usize::from(BigEndian::read_u16(&eapol[2..4]));
    let available = eapol.len() - EAPOL_HEADER_LEN;

    if body_len > available {
        return EapolRxEvent::Dropped(EapolDropReason::LengthError);
    }

    let body = eapol[EAPOL_HEADER_LEN..EAPOL_HEADER_LEN + body_len].to_vec();

    EapolRxEvent::Accepted {
        eth: EthernetHeader {
            dst,
            src,
            ether_type,
        },
        frame: EapolFrame {
            protocol_version,
            packet_type,
            body,
        },
    }
}

/// Encodes an EAPOL frame for transmission. The destination is always the
/// PAE group address and `protocolVersion` is always set to 2 on output
/// (spec.md §4.1).
#[must_use]
pub fn encode_eapol_frame(src: MacAddr, packet_type: EapolPacketType, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(ETH_HEADER_LEN + EAPOL_HEADER_LEN + body.len());
    out.extend_from_slice(&PAE_GROUP_ADDR.0);
    out.extend_from_slice(&src.0);
    out.extend_from_slice(&EAPOL_ETHER_TYPE.to_be_bytes());
    out.push(2); // protocolVersion
    out.push(packet_type as u8);
    out.extend_from_slice(&(body.len() as u16).to_be_bytes());
    out.extend_from_slice(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(last: u8) -> MacAddr {
        MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, last])
    }

    #[test]
    fn round_trips_eap_body() {
        let src = mac(0x01);
        let body = vec![1, 2, 3, 4];
        let raw = encode_eapol_frame(src, EapolPacketType::Eap, &body);

        match decode_eapol_frame(&raw, src) {
            EapolRxEvent::Accepted { eth, frame } => {
                assert_eq!(eth.dst, PAE_GROUP_ADDR);
                assert_eq!(eth.src, src);
                assert_eq!(eth.ether_type, EAPOL_ETHER_TYPE);
                assert_eq!(frame.protocol_version, 2);
                assert_eq!(frame.packet_type, EapolPacketType::Eap);
                assert_eq!(frame.body, body);
            }
            other => panic!("expected Accepted, got {other:?}"),
        }
    }

    #[test]
    fn start_and_logoff_carry_empty_bodies() {
        let src = mac(0x02);
        let raw = encode_eapol_frame(src, EapolPacketType::Start, &[]);
        match decode_eapol_frame(&raw, src) {
            EapolRxEvent::Accepted { frame, .. } => {
                assert_eq!(frame.packet_type, EapolPacketType::Start);
                assert!(frame.body.is_empty());
            }
            other => panic!("expected Accepted, got {other:?}"),
        }
    }

    #[test]
    fn drops_wrong_destination() {
        let raw = encode_eapol_frame(mac(0x01), EapolPacketType::Eap, &[]);
        let mut raw = raw;
        raw[0..6].copy_from_slice(&mac(0xAA).0); // not PAE group, not ours
        assert_eq!(
            decode_eapol_frame(&raw, mac(0x01)),
            EapolRxEvent::Dropped(EapolDropReason::WrongDestination)
        );
    }

    #[test]
    fn drops_undersized_frame() {
        let raw = vec![0u8; 10];
        assert_eq!(
            decode_eapol_frame(&raw, mac(0x01)),
            EapolRxEvent::Dropped(EapolDropReason::Undersized)
        );
    }

    #[test]
    fn drops_body_length_exceeding_frame() {
        let mut raw = encode_eapol_frame(mac(0x01), EapolPacketType::Eap, &[1, 2, 3, 4]);
        // Lie about the body length.
        BigEndian::write_u16(&mut raw[ETH_HEADER_LEN + 2..ETH_HEADER_LEN + 4], 200);
        assert_eq!(
            decode_eapol_frame(&raw, mac(0x01)),
            EapolRxEvent::Dropped(EapolDropReason::LengthError)
        );
    }

    #[test]
    fn truncates_to_declared_length_ignoring_padding() {
        let mut raw = encode_eapol_frame(mac(0x01), EapolPacketType::Eap, &[1, 2, 3, 4]);
        raw.extend_from_slice(&[0xFF; 10]); // link-layer padding
        match decode_eapol_frame(&raw, mac(0x01)) {
            EapolRxEvent::Accepted { frame, .. } => assert_eq!(frame.body, vec![1, 2, 3, 4]),
            other => panic!("expected Accepted, got {other:?}"),
        }
    }
}
