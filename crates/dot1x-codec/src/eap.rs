//! EAP packet codec (spec.md §3, "EAP packet").

use byteorder::{BigEndian, ByteOrder};
use dot1x_types::eap::{EapCode, EapPacket, EapType};

const EAP_HEADER_LEN: usize = 4;

/// Decodes an EAP packet from `data` (the EAPOL body, already truncated to
/// its declared length by the EAPOL codec). The Length field is
/// authoritative (spec.md §3): bytes beyond it are padding and ignored.
/// Returns `None` on any malformed input; callers must drop the frame and
/// count it rather than propagate an error (spec.md §7).
#[must_use]
pub fn decode_eap_packet(data: &[u8]) -> Option<EapPacket> {
    if data.len() < EAP_HEADER_LEN {
        return None;
    }

    let code = EapCode::from_u8(data[0])?;
    let identifier = data[1];
    let length = usize::from(BigEndian::read_u16(&data[2..4]));

    if length < EAP_HEADER_LEN || length > data.len() {
        return None;
    }
    let data = &data[..length];

    match code {
        EapCode::Request | EapCode::Response => {
            if data.len() < EAP_HEADER_LEN + 1 {
                return None;
            }
            let eap_type = EapType::from_u8(data[4]);
            let type_data = data[5..].to_vec();
            Some(EapPacket {
                code,
                identifier,
                eap_type: Some(eap_type),
                type_data,
            })
        }
        EapCode::Success | EapCode::Failure => Some(EapPacket {
            code,
            identifier,
            eap_type: None,
            type_data: Vec::new(),
        }),
    }
}

/// Encodes an EAP packet to its wire representation.
#[must_use]
pub fn encode_eap_packet(packet: &EapPacket) -> Vec<u8> {
    let mut out = Vec::with_capacity(EAP_HEADER_LEN + 1 + packet.type_data.len());
    out.push(match packet.code {
        EapCode::Request => 1,
        EapCode::Response => 2,
        EapCode::Success => 3,
        EapCode::Failure => 4,
    });
    out.push(packet.identifier);
    out.extend_from_slice(&[0, 0]); // length, filled in below

    if let Some(eap_type) = packet.eap_type {
        out.push(eap_type.as_u8());
        out.extend_from_slice(&packet.type_data);
    }

    let length = out.len() as u16;
    BigEndian::write_u16(&mut out[2..4], length);
    out
}

/// Builds a canned EAP-Success or EAP-Failure with the given identifier
/// (spec.md §4.4: emitted on entry to `FORCE_AUTH`/`FORCE_UNAUTH`).
#[must_use]
pub fn build_canned(code: EapCode, identifier: u8) -> Vec<u8> {
    encode_eap_packet(&EapPacket {
        code,
        identifier,
        eap_type: None,
        type_data: Vec::new(),
    })
}

/// Computes the next EAP identifier (spec.md §4.3, `nextId`): from the
/// sentinel `None` the first identifier is 0; otherwise it advances
/// modulo 256 (spec.md §3 invariant 1).
#[must_use]
pub fn next_id(current: Option<u8>) -> u8 {
    match current {
        None => 0,
        Some(id) => id.wrapping_add(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_request_identity() {
        let packet = EapPacket {
            code: EapCode::Request,
            identifier: 7,
            eap_type: Some(EapType::Identity),
            type_data: Vec::new(),
        };
        let raw = encode_eap_packet(&packet);
        assert_eq!(raw, vec![1, 7, 0, 5, 1]);
        assert_eq!(decode_eap_packet(&raw), Some(packet));
    }

    #[test]
    fn round_trips_response_md5_challenge() {
        let packet = EapPacket {
            code: EapCode::Response,
            identifier: 42,
            eap_type: Some(EapType::Md5Challenge),
            type_data: vec![16, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
        };
        let raw = encode_eap_packet(&packet);
        assert_eq!(decode_eap_packet(&raw), Some(packet));
    }

    #[test]
    fn canned_success_has_no_type_data() {
        let raw = build_canned(EapCode::Success, 1);
        assert_eq!(raw, vec![3, 1, 0, 4]);
    }

    #[test]
    fn canned_failure_has_no_type_data() {
        let raw = build_canned(EapCode::Failure, 9);
        assert_eq!(raw, vec![4, 9, 0, 4]);
    }

    #[test]
    fn length_field_is_authoritative_over_padding() {
        let mut raw = encode_eap_packet(&EapPacket {
            code: EapCode::Request,
            identifier: 1,
            eap_type: Some(EapType::Identity),
            type_data: Vec::new(),
        });
        raw.extend_from_slice(&[0xAA; 8]); // link-layer padding
        let decoded = decode_eap_packet(&raw).unwrap();
        assert_eq!(decoded.identifier, 1);
    }

    #[test]
    fn rejects_declared_length_beyond_buffer() {
        let mut raw = vec![1, 1, 0, 100]; // length=100 but buffer is 4 bytes
        raw.extend_from_slice(&[1]);
        assert_eq!(decode_eap_packet(&raw), None);
    }

    #[test]
    fn next_id_wraps_modulo_256() {
        assert_eq!(next_id(None), 0);
        assert_eq!(next_id(Some(0)), 1);
        assert_eq!(next_id(Some(255)), 0);
    }
}
