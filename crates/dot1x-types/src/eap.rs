//! EAP packet types (spec.md §3, "EAP packet"; RFC 3748).

use strum::Display;

/// Sentinel for "no previous identifier", matching the C source's
/// `EAP_LAST_ID_NONE` / the peer's `lastId` sentinel (spec.md §3 invariants).
pub const EAP_ID_NONE: Option<u8> = None;

/// An EAP packet, parsed or ready to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapPacket {
    /// Code.
    pub code: EapCode,
    /// Identifier.
    pub identifier: u8,
    /// Type (present for Request/Response only).
    pub eap_type: Option<EapType>,
    /// Type-data (payload after the type byte, or after the header for
    /// Success/Failure, which carry no type-data).
    pub type_data: Vec<u8>,
}

/// EAP code (RFC 3748 §4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EapCode {
    /// Request.
    Request = 1,
    /// Response.
    Response = 2,
    /// Success.
    Success = 3,
    /// Failure.
    Failure = 4,
}

impl EapCode {
    /// Parses a raw code octet.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            1 => Self::Request,
            2 => Self::Response,
            3 => Self::Success,
            4 => Self::Failure,
            _ => return None,
        })
    }
}

/// EAP method/type byte (RFC 3748 §5 and the methods in scope per spec.md §1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EapType {
    /// Identity (1).
    Identity,
    /// Notification (2).
    Notification,
    /// Legacy Nak (3).
    Nak,
    /// MD5-Challenge (4).
    Md5Challenge,
    /// EAP-TLS (13).
    Tls,
    /// Any other registered type, carried opaquely.
    Other(u8),
}

impl std::fmt::Display for EapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::Notification => write!(f, "Notification"),
            Self::Nak => write!(f, "Nak"),
            Self::Md5Challenge => write!(f, "MD5-Challenge"),
            Self::Tls => write!(f, "TLS"),
            Self::Other(v) => write!(f, "Other({v})"),
        }
    }
}

impl EapType {
    /// Returns the wire value of this type.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Notification => 2,
            Self::Nak => 3,
            Self::Md5Challenge => 4,
            Self::Tls => 13,
            Self::Other(v) => v,
        }
    }

    /// Parses a raw type octet.
    #[must_use]
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Identity,
            2 => Self::Notification,
            3 => Self::Nak,
            4 => Self::Md5Challenge,
            13 => Self::Tls,
            other => Self::Other(other),
        }
    }
}

/// Outcome of processing an EAP request within a method (RFC 4137 §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodState {
    /// No method is running.
    #[default]
    None,
    /// The method has just been selected.
    Init,
    /// The method needs more round trips.
    Cont,
    /// The method may be complete, but might also continue.
    MayCont,
    /// The method is complete.
    Done,
}

/// The method's (or the peer/authenticator policy's) verdict on the
/// exchange so far (RFC 4137 §4.1/§5.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    /// Authentication has failed.
    #[default]
    Fail,
    /// Success, conditional on no further failure indication.
    CondSucc,
    /// Unconditional success.
    UncondSucc,
}
