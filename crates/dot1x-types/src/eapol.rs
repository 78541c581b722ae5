//! EAPOL protocol constants and types (spec.md §3, "EAPOL frame").

use strum::{Display, EnumString};

/// EtherType reserved for EAPOL traffic.
pub const EAPOL_ETHER_TYPE: u16 = 0x888E;

/// EAPOL frame as carried over the PAE raw socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapolFrame {
    /// Protocol version (1, 2, or 3). Output frames always use version 2.
    pub protocol_version: u8,
    /// Packet type.
    pub packet_type: EapolPacketType,
    /// Packet body (EAP payload for `Eap`, empty for `Start`/`Logoff`).
    pub body: Vec<u8>,
}

/// EAPOL packet type (IEEE 802.1X-2010, Table 11-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(u8)]
pub enum EapolPacketType {
    /// EAP-Packet.
    Eap = 0,
    /// EAPOL-Start.
    Start = 1,
    /// EAPOL-Logoff.
    Logoff = 2,
    /// EAPOL-Key.
    Key = 3,
    /// EAPOL-Encapsulated-ASF-Alert.
    AsfAlert = 4,
    /// EAPOL-MKA.
    Mka = 5,
    /// EAPOL-Announcement (generic).
    Announcement = 6,
    /// EAPOL-Announcement (specific).
    AnnouncementSpecific = 7,
    /// EAPOL-Announcement-Req.
    AnnouncementReq = 8,
}

impl EapolPacketType {
    /// Parses a raw packet-type octet, returning `None` for reserved values.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Eap,
            1 => Self::Start,
            2 => Self::Logoff,
            3 => Self::Key,
            4 => Self::AsfAlert,
            5 => Self::Mka,
            6 => Self::Announcement,
            7 => Self::AnnouncementSpecific,
            8 => Self::AnnouncementReq,
            _ => return None,
        })
    }
}
