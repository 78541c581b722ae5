//! RADIUS Access-Request builder and response validator (spec.md §4.8,
//! §4.9).

use byteorder::{BigEndian, ByteOrder};
use dot1x_codec::radius::{
    chunk_eap_message, decode_radius_packet, encode_radius_packet, sign_access_request,
    verify_response_authenticator,
};
use dot1x_types::mac::MacAddr;
use dot1x_types::radius::{
    RadiusAttribute, RadiusAttributeType, RadiusCode, RadiusPacket, NAS_PORT_TYPE_ETHERNET,
    SERVICE_TYPE_FRAMED,
};
use std::net::IpAddr;

/// Inputs to one Access-Request (spec.md §4.8).
pub struct AccessRequestParams<'a> {
    pub identifier: u8,
    pub req_authenticator: [u8; 16],
    pub port_index: u32,
    pub ifname: &'a str,
    pub nas_ip: IpAddr,
    pub bridge_mac: MacAddr,
    pub supplicant_mac: MacAddr,
    pub identity: &'a [u8],
    pub eap_packet: &'a [u8],
    pub server_state: &'a [u8],
    pub shared_secret: &'a [u8],
}

/// The EAP fragment cap advertised via `Framed-MTU` (spec.md §4.8).
const FRAMED_MTU: u32 = 1000;

fn u32_attr(attr_type: RadiusAttributeType, value: u32) -> RadiusAttribute {
    let mut bytes = [0u8; 4];
    BigEndian::write_u32(&mut bytes, value);
    RadiusAttribute {
        attr_type,
        value: bytes.to_vec(),
    }
}

fn mac_ascii(mac: MacAddr) -> Vec<u8> {
    mac.to_string().into_bytes()
}

/// Builds a complete, signed Access-Request, ready to hand to the RADIUS
/// transport.
#[must_use]
pub fn build_access_request(params: &AccessRequestParams<'_>) -> Vec<u8> {
    let identity = if params.identity.len() > 64 {
        &params.identity[..64]
    } else {
        params.identity
    };

    let mut attributes = vec![
        RadiusAttribute {
            attr_type: RadiusAttributeType::UserName,
            value: identity.to_vec(),
        },
        u32_attr(RadiusAttributeType::ServiceType, SERVICE_TYPE_FRAMED),
        u32_attr(RadiusAttributeType::FramedMtu, FRAMED_MTU),
    ];

    match params.nas_ip {
        IpAddr::V4(v4) => attributes.push(RadiusAttribute {
            attr_type: RadiusAttributeType::NasIpAddress,
            value: v4.octets().to_vec(),
        }),
        IpAddr::V6(v6) => attributes.push(RadiusAttribute {
            attr_type: RadiusAttributeType::NasIpv6Address,
            value: v6.octets().to_vec(),
        }),
    }

    attributes.push(u32_attr(RadiusAttributeType::NasPort, params.port_index));
    attributes.push(u32_attr(
        RadiusAttributeType::NasPortType,
        NAS_PORT_TYPE_ETHERNET,
    ));
    attributes.push(RadiusAttribute {
        attr_type: RadiusAttributeType::NasPortId,
        value: format!("{}_{}", params.ifname, params.port_index).into_bytes(),
    });
    attributes.push(RadiusAttribute {
        attr_type: RadiusAttributeType::CalledStationId,
        value: mac_ascii(params.bridge_mac),
    });
    attributes.push(RadiusAttribute {
        attr_type: RadiusAttributeType::CallingStationId,
        value: mac_ascii(params.supplicant_mac),
    });

    if !params.server_state.is_empty() {
        attributes.push(RadiusAttribute {
            attr_type: RadiusAttributeType::State,
            value: params.server_state.to_vec(),
        });
    }

    attributes.extend(chunk_eap_message(params.eap_packet));

    attributes.push(RadiusAttribute {
        attr_type: RadiusAttributeType::MessageAuthenticator,
        value: vec![0u8; 16],
    });

    let packet = RadiusPacket {
        code: RadiusCode::AccessRequest,
        identifier: params.identifier,
        authenticator: params.req_authenticator,
        attributes,
    };

    sign_access_request(&packet, params.shared_secret)
}

/// A validated Access-Accept/Reject/Challenge, reduced to what the
/// EAP-full FSM's pass-through zone needs.
#[derive(Debug)]
pub struct ValidatedResponse {
    pub code: RadiusCode,
    pub identifier: u8,
    /// Reassembled EAP packet, empty if the server sent none.
    pub eap_packet: Vec<u8>,
    /// `State` attribute value, to echo in the next request.
    pub state: Vec<u8>,
}

/// Validates a raw RADIUS response against the outstanding request it is
/// claimed to answer (spec.md §4.9). Returns `None` on any validation
/// failure; callers must silently discard per spec.md §7.
#[must_use]
pub fn validate_response(
    raw: &[u8],
    req_authenticator: [u8; 16],
    shared_secret: &[u8],
) -> Option<ValidatedResponse> {
    if raw.len() < 20 {
        return None;
    }
    let declared_len = usize::from(BigEndian::read_u16(&raw[2..4]));
    if declared_len > raw.len() {
        return None;
    }
    let raw = &raw[..declared_len];

    let packet = decode_radius_packet(raw).ok()?;
    if !matches!(
        packet.code,
        RadiusCode::AccessAccept | RadiusCode::AccessReject | RadiusCode::AccessChallenge
    ) {
        return None;
    }

    if !verify_response_authenticator(raw, req_authenticator, shared_secret) {
        tracing::warn!("RADIUS response authenticator mismatch, discarding");
        return None;
    }

    let message_authenticator =
        packet.find_attribute(RadiusAttributeType::MessageAuthenticator)?;
    if message_authenticator.value.len() != 16 {
        return None;
    }

    let mut zeroed = packet.clone();
    for attr in &mut zeroed.attributes {
        if attr.attr_type == RadiusAttributeType::MessageAuthenticator {
            attr.value = vec![0u8; 16];
        }
    }
    zeroed.authenticator = req_authenticator;
    let recomputed = dot1x_crypto::hmac_md5(shared_secret, &encode_radius_packet(&zeroed));
    if recomputed != message_authenticator.value[..] {
        tracing::warn!("RADIUS Message-Authenticator mismatch, discarding");
        return None;
    }

    let state = packet
        .find_attribute(RadiusAttributeType::State)
        .map(|a| a.value.clone())
        .unwrap_or_default();

    Some(ValidatedResponse {
        code: packet.code,
        identifier: packet.identifier,
        eap_packet: packet.reassemble_eap_message(),
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn params(identity: &'static [u8], eap_packet: &'static [u8]) -> AccessRequestParams<'static> {
        AccessRequestParams {
            identifier: 9,
            req_authenticator: [0x01; 16],
            port_index: 3,
            ifname: "eth0",
            nas_ip: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            bridge_mac: MacAddr([0, 1, 2, 3, 4, 5]),
            supplicant_mac: MacAddr([6, 7, 8, 9, 10, 11]),
            identity,
            eap_packet,
            server_state: &[],
            shared_secret: b"secret",
        }
    }

    #[test]
    fn build_access_request_carries_expected_attributes() {
        let p = params(b"alice", &[2, 1, 0, 6, 1, b'a', b'l', b'i', b'c', b'e']);
        let raw = build_access_request(&p);
        let packet = decode_radius_packet(&raw).unwrap();

        assert_eq!(packet.code, RadiusCode::AccessRequest);
        assert_eq!(
            packet
                .find_attribute(RadiusAttributeType::UserName)
                .unwrap()
                .value,
            b"alice"
        );
        assert_eq!(
            packet
                .find_attribute(RadiusAttributeType::NasPort)
                .unwrap()
                .value,
            vec![0, 0, 0, 3]
        );
        assert!(packet
            .find_attribute(RadiusAttributeType::MessageAuthenticator)
            .is_some());
    }

    #[test]
    fn build_access_request_omits_state_when_empty() {
        let p = params(b"alice", &[]);
        let raw = build_access_request(&p);
        let packet = decode_radius_packet(&raw).unwrap();
        assert!(packet.find_attribute(RadiusAttributeType::State).is_none());
    }

    #[test]
    fn build_access_request_echoes_state_when_present() {
        let mut p = params(b"alice", &[]);
        p.server_state = b"DEADBEEF";
        let raw = build_access_request(&p);
        let packet = decode_radius_packet(&raw).unwrap();
        assert_eq!(
            packet.find_attribute(RadiusAttributeType::State).unwrap().value,
            b"DEADBEEF"
        );
    }

    #[test]
    fn validate_response_round_trips_with_builder() {
        let secret = b"shared-secret";
        let req_authenticator = [0x42; 16];

        let mut response = RadiusPacket {
            code: RadiusCode::AccessChallenge,
            identifier: 9,
            authenticator: [0u8; 16],
            attributes: vec![
                RadiusAttribute {
                    attr_type: RadiusAttributeType::State,
                    value: b"DEADBEEF".to_vec(),
                },
                RadiusAttribute {
                    attr_type: RadiusAttributeType::EapMessage,
                    value: vec![1, 9, 0, 5, 1],
                },
                RadiusAttribute {
                    attr_type: RadiusAttributeType::MessageAuthenticator,
                    value: vec![0u8; 16],
                },
            ],
        };

        // Sign Message-Authenticator as a server would (over the packet
        // with the request authenticator substituted in).
        let mut for_mac = response.clone();
        for_mac.authenticator = req_authenticator;
        let mac = dot1x_crypto::hmac_md5(secret, &encode_radius_packet(&for_mac));
        for attr in &mut response.attributes {
            if attr.attr_type == RadiusAttributeType::MessageAuthenticator {
                attr.value = mac.to_vec();
            }
        }

        // Compute the real Response Authenticator.
        let mut raw = encode_radius_packet(&response);
        raw[4..20].copy_from_slice(&req_authenticator);
        raw.extend_from_slice(secret);
        let digest = dot1x_crypto::md5(&raw);
        response.authenticator = digest;
        let raw = encode_radius_packet(&response);

        let validated = validate_response(&raw, req_authenticator, secret).unwrap();
        assert_eq!(validated.code, RadiusCode::AccessChallenge);
        assert_eq!(validated.state, b"DEADBEEF");
        assert_eq!(validated.eap_packet, vec![1, 9, 0, 5, 1]);
    }

    #[test]
    fn validate_response_rejects_bad_response_authenticator() {
        let secret = b"shared-secret";
        let req_authenticator = [0x42; 16];
        let response = RadiusPacket {
            code: RadiusCode::AccessReject,
            identifier: 9,
            authenticator: [0xFF; 16], // wrong on purpose
            attributes: vec![RadiusAttribute {
                attr_type: RadiusAttributeType::MessageAuthenticator,
                value: vec![0u8; 16],
            }],
        };
        let raw = encode_radius_packet(&response);
        assert!(validate_response(&raw, req_authenticator, secret).is_none());
    }
}
