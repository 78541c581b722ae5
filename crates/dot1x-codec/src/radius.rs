//! RADIUS packet codec, Message-Authenticator, and Response Authenticator
//! (spec.md §3 "RADIUS packet", §4.8, §4.9; RFC 2865/2869/3579).

use byteorder::{BigEndian, ByteOrder};
use dot1x_types::radius::{RadiusAttribute, RadiusAttributeType, RadiusCode, RadiusPacket};

const RADIUS_HEADER_LEN: usize = 20;
const ATTR_HEADER_LEN: usize = 2;
const MAX_ATTR_VALUE_LEN: usize = 253;

/// Reason a received RADIUS packet was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusDecodeError {
    /// Shorter than the fixed 20-byte header.
    Undersized,
    /// Code octet is not one of the four codes this implementation handles.
    UnknownCode,
    /// Declared Length doesn't fit the bytes available.
    LengthError,
    /// An attribute's declared length is too short to contain its header.
    MalformedAttribute,
}

/// Decodes a RADIUS packet from `data`. Per spec.md §7, malformed input is
/// reported to the caller (unlike EAPOL/EAP, RADIUS responses come from a
/// single configured, trusted peer, so this level distinguishes failure
/// reasons rather than silently dropping).
pub fn decode_radius_packet(data: &[u8]) -> Result<RadiusPacket, RadiusDecodeError> {
    if data.len() < RADIUS_HEADER_LEN {
        return Err(RadiusDecodeError::Undersized);
    }

    let code = RadiusCode::from_u8(data[0]).ok_or(RadiusDecodeError::UnknownCode)?;
    let identifier = data[1];
    let length = usize::from(BigEndian::read_u16(&data[2..4]));
    if length < RADIUS_HEADER_LEN || length > data.len() {
        return Err(RadiusDecodeError::LengthError);
    }
    let mut authenticator = [0u8; 16];
    authenticator.copy_from_slice(&data[4..20]);

    let mut attributes = Vec::new();
    let mut offset = RADIUS_HEADER_LEN;
    while offset < length {
        if offset + ATTR_HEADER_LEN > length {
            return Err(RadiusDecodeError::MalformedAttribute);
        }
        let attr_type = data[offset];
        let attr_len = usize::from(data[offset + 1]);
        if attr_len < ATTR_HEADER_LEN || offset + attr_len > length {
            return Err(RadiusDecodeError::MalformedAttribute);
        }
        let value = data[offset + ATTR_HEADER_LEN..offset + attr_len].to_vec();
        attributes.push(RadiusAttribute {
            attr_type: RadiusAttributeType::from_u8(attr_type),
            value,
        });
        offset += attr_len;
    }

    Ok(RadiusPacket {
        code,
        identifier,
        authenticator,
        attributes,
    })
}

/// Encodes a RADIUS packet, not including any Message-Authenticator fixup
/// (see [`sign_access_request`] for that).
#[must_use]
pub fn encode_radius_packet(packet: &RadiusPacket) -> Vec<u8> {
    let mut out = vec![0u8; RADIUS_HEADER_LEN];
    out[0] = packet.code.as_u8();
    out[1] = packet.identifier;
    out[4..20].copy_from_slice(&packet.authenticator);

    for attr in &packet.attributes {
        debug_assert!(attr.value.len() <= MAX_ATTR_VALUE_LEN);
        out.push(attr.attr_type.as_u8());
        out.push((attr.value.len() + ATTR_HEADER_LEN) as u8);
        out.extend_from_slice(&attr.value);
    }

    let length = out.len() as u16;
    BigEndian::write_u16(&mut out[2..4], length);
    out
}

/// Splits an EAP packet into a sequence of `EAP-Message` attribute values,
/// each at most 253 bytes (spec.md §4.8).
#[must_use]
pub fn chunk_eap_message(eap_packet: &[u8]) -> Vec<RadiusAttribute> {
    if eap_packet.is_empty() {
        return vec![RadiusAttribute {
            attr_type: RadiusAttributeType::EapMessage,
            value: Vec::new(),
        }];
    }
    eap_packet
        .chunks(MAX_ATTR_VALUE_LEN)
        .map(|chunk| RadiusAttribute {
            attr_type: RadiusAttributeType::EapMessage,
            value: chunk.to_vec(),
        })
        .collect()
}

/// Computes and fills in the `Message-Authenticator` attribute of an
/// Access-Request per RFC 3579 §3.2: the attribute's value is zeroed, the
/// whole packet is HMAC-MD5'd under the shared secret, and the result
/// replaces the zeroed value.
///
/// `packet` must already carry a `Message-Authenticator` attribute (with
/// any placeholder value of the correct 16-byte length) so its position in
/// the encoded bytes is stable.
#[must_use]
pub fn sign_access_request(packet: &RadiusPacket, shared_secret: &[u8]) -> Vec<u8> {
    let mut zeroed = packet.clone();
    for attr in &mut zeroed.attributes {
        if attr.attr_type == RadiusAttributeType::MessageAuthenticator {
            attr.value = vec![0u8; 16];
        }
    }
    let mut encoded = encode_radius_packet(&zeroed);
    let mac = dot1x_crypto::hmac_md5(shared_secret, &encoded);

    if let Some(offset) = find_message_authenticator_value_offset(&encoded) {
        encoded[offset..offset + 16].copy_from_slice(&mac);
    }
    encoded
}

fn find_message_authenticator_value_offset(encoded: &[u8]) -> Option<usize> {
    let mut offset = RADIUS_HEADER_LEN;
    while offset + ATTR_HEADER_LEN <= encoded.len() {
        let attr_type = encoded[offset];
        let attr_len = usize::from(encoded[offset + 1]);
        if attr_type == RadiusAttributeType::MessageAuthenticator.as_u8() {
            return Some(offset + ATTR_HEADER_LEN);
        }
        if attr_len < ATTR_HEADER_LEN {
            return None;
        }
        offset += attr_len;
    }
    None
}

/// Verifies the Response Authenticator of an Access-Accept/Reject/Challenge
/// (RFC 2865 §3): `MD5(Code + Identifier + Length + RequestAuthenticator +
/// Attributes + SharedSecret)` must equal the Authenticator field actually
/// received.
#[must_use]
pub fn verify_response_authenticator(
    raw_response: &[u8],
    request_authenticator: [u8; 16],
    shared_secret: &[u8],
) -> bool {
    if raw_response.len() < RADIUS_HEADER_LEN {
        return false;
    }
    let mut buf = raw_response.to_vec();
    let received = {
        let mut a = [0u8; 16];
        a.copy_from_slice(&buf[4..20]);
        a
    };
    buf[4..20].copy_from_slice(&request_authenticator);
    buf.extend_from_slice(shared_secret);
    let computed = dot1x_crypto::md5(&buf);
    computed == received
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_packet() -> RadiusPacket {
        RadiusPacket {
            code: RadiusCode::AccessRequest,
            identifier: 5,
            authenticator: [0x11; 16],
            attributes: vec![
                RadiusAttribute {
                    attr_type: RadiusAttributeType::UserName,
                    value: b"alice".to_vec(),
                },
                RadiusAttribute {
                    attr_type: RadiusAttributeType::NasPort,
                    value: vec![0, 0, 0, 1],
                },
            ],
        }
    }

    #[test]
    fn round_trips_access_request() {
        let packet = sample_packet();
        let raw = encode_radius_packet(&packet);
        let decoded = decode_radius_packet(&raw).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn rejects_undersized_packet() {
        assert_eq!(
            decode_radius_packet(&[0u8; 10]),
            Err(RadiusDecodeError::Undersized)
        );
    }

    #[test]
    fn rejects_unknown_code() {
        let mut raw = encode_radius_packet(&sample_packet());
        raw[0] = 99;
        assert_eq!(
            decode_radius_packet(&raw),
            Err(RadiusDecodeError::UnknownCode)
        );
    }

    #[test]
    fn chunk_eap_message_splits_on_253_bytes() {
        let big = vec![0x42u8; 600];
        let attrs = chunk_eap_message(&big);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].value.len(), 253);
        assert_eq!(attrs[1].value.len(), 253);
        assert_eq!(attrs[2].value.len(), 94);
    }

    #[test]
    fn message_authenticator_is_verifiable_by_recomputation() {
        let mut packet = sample_packet();
        packet.attributes.push(RadiusAttribute {
            attr_type: RadiusAttributeType::MessageAuthenticator,
            value: vec![0u8; 16],
        });
        let secret = b"shared-secret";
        let signed = sign_access_request(&packet, secret);

        let offset = find_message_authenticator_value_offset(&signed).unwrap();
        let mac_in_packet = signed[offset..offset + 16].to_vec();

        let mut zeroed = signed.clone();
        zeroed[offset..offset + 16].copy_from_slice(&[0u8; 16]);
        let recomputed = dot1x_crypto::hmac_md5(secret, &zeroed);

        assert_eq!(mac_in_packet, recomputed);
    }

    #[test]
    fn response_authenticator_round_trips() {
        let request_authenticator = [0x22; 16];
        let secret = b"shared-secret";

        let mut response = RadiusPacket {
            code: RadiusCode::AccessAccept,
            identifier: 5,
            authenticator: [0u8; 16], // filled in below
            attributes: vec![],
        };
        let mut raw = encode_radius_packet(&response);
        raw[4..20].copy_from_slice(&request_authenticator);
        raw.extend_from_slice(secret);
        let digest = dot1x_crypto::md5(&raw);
        response.authenticator = digest;

        let final_raw = encode_radius_packet(&response);
        assert!(verify_response_authenticator(
            &final_raw,
            request_authenticator,
            secret
        ));
    }

    #[test]
    fn response_authenticator_rejects_tampering() {
        let request_authenticator = [0x22; 16];
        let secret = b"shared-secret";
        let mut response = RadiusPacket {
            code: RadiusCode::AccessReject,
            identifier: 5,
            authenticator: [0u8; 16],
            attributes: vec![],
        };
        let mut raw = encode_radius_packet(&response);
        raw[4..20].copy_from_slice(&request_authenticator);
        raw.extend_from_slice(secret);
        response.authenticator = dot1x_crypto::md5(&raw);

        let mut final_raw = encode_radius_packet(&response);
        final_raw[1] = 99; // tamper with identifier after signing
        assert!(!verify_response_authenticator(
            &final_raw,
            request_authenticator,
            secret
        ));
    }
}
