//! RADIUS packet types (spec.md §3, "RADIUS packet"; RFC 2865/2869/3579).

/// RADIUS packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusPacket {
    /// Code.
    pub code: RadiusCode,
    /// Identifier.
    pub identifier: u8,
    /// 16-byte Request/Response Authenticator.
    pub authenticator: [u8; 16],
    /// Attributes, in wire order.
    pub attributes: Vec<RadiusAttribute>,
}

/// RADIUS packet code (spec.md §3: "Codes handled").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusCode {
    /// Access-Request.
    AccessRequest,
    /// Access-Accept.
    AccessAccept,
    /// Access-Reject.
    AccessReject,
    /// Access-Challenge.
    AccessChallenge,
}

impl RadiusCode {
    /// Returns the wire value of this code.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::AccessRequest => 1,
            Self::AccessAccept => 2,
            Self::AccessReject => 3,
            Self::AccessChallenge => 11,
        }
    }

    /// Parses a raw code octet, restricted to the codes spec.md §3 says
    /// are handled.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            1 => Self::AccessRequest,
            2 => Self::AccessAccept,
            3 => Self::AccessReject,
            11 => Self::AccessChallenge,
            _ => return None,
        })
    }
}

/// A single RADIUS attribute TLV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusAttribute {
    /// Attribute type.
    pub attr_type: RadiusAttributeType,
    /// Attribute value (≤ 253 bytes, per spec.md §3).
    pub value: Vec<u8>,
}

/// RADIUS attribute types used by this implementation (spec.md §4.8/§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusAttributeType {
    /// User-Name (1).
    UserName,
    /// NAS-IP-Address (4).
    NasIpAddress,
    /// NAS-Port (5).
    NasPort,
    /// Service-Type (6).
    ServiceType,
    /// Framed-MTU (12).
    FramedMtu,
    /// State (24).
    State,
    /// Called-Station-Id (30).
    CalledStationId,
    /// Calling-Station-Id (31).
    CallingStationId,
    /// NAS-Port-Type (61).
    NasPortType,
    /// EAP-Message (79).
    EapMessage,
    /// Message-Authenticator (80).
    MessageAuthenticator,
    /// NAS-Port-Id (87).
    NasPortId,
    /// NAS-IPv6-Address (95).
    NasIpv6Address,
    /// Any other registered type, carried opaquely.
    Other(u8),
}

impl RadiusAttributeType {
    /// Returns the wire value of this attribute type.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::UserName => 1,
            Self::NasIpAddress => 4,
            Self::NasPort => 5,
            Self::ServiceType => 6,
            Self::FramedMtu => 12,
            Self::State => 24,
            Self::CalledStationId => 30,
            Self::CallingStationId => 31,
            Self::NasPortType => 61,
            Self::EapMessage => 79,
            Self::MessageAuthenticator => 80,
            Self::NasPortId => 87,
            Self::NasIpv6Address => 95,
            Self::Other(v) => v,
        }
    }

    /// Parses a raw attribute-type octet.
    #[must_use]
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::UserName,
            4 => Self::NasIpAddress,
            5 => Self::NasPort,
            6 => Self::ServiceType,
            12 => Self::FramedMtu,
            24 => Self::State,
            30 => Self::CalledStationId,
            31 => Self::CallingStationId,
            61 => Self::NasPortType,
            79 => Self::EapMessage,
            80 => Self::MessageAuthenticator,
            87 => Self::NasPortId,
            95 => Self::NasIpv6Address,
            other => Self::Other(other),
        }
    }
}

/// RADIUS `Service-Type` values relevant to spec.md §4.8.
pub const SERVICE_TYPE_FRAMED: u32 = 2;

/// RADIUS `NAS-Port-Type` value for Ethernet (spec.md §4.8).
pub const NAS_PORT_TYPE_ETHERNET: u32 = 15;

/// Maximum size of an EAP-Message attribute's value field (spec.md §4.8:
/// "each carrying ≤253 bytes").
pub const MAX_EAP_MESSAGE_CHUNK: usize = 253;

/// Maximum size of the RADIUS `State` attribute value this implementation
/// caches (spec.md §3: "`serverState[≤64]`").
pub const MAX_STATE_LEN: usize = 64;

impl RadiusPacket {
    /// Finds the first attribute of the given type.
    #[must_use]
    pub fn find_attribute(&self, attr_type: RadiusAttributeType) -> Option<&RadiusAttribute> {
        self.attributes.iter().find(|a| a.attr_type == attr_type)
    }

    /// Concatenates the value fields of every `EAP-Message` attribute, in
    /// order, reconstructing the original EAP packet (spec.md §4.9).
    #[must_use]
    pub fn reassemble_eap_message(&self) -> Vec<u8> {
        self.attributes
            .iter()
            .filter(|a| a.attr_type == RadiusAttributeType::EapMessage)
            .flat_map(|a| a.value.iter().copied())
            .collect()
    }
}
