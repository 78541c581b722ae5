//! Ethernet MAC address helpers.

use std::fmt;

/// A 6-byte Ethernet MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MacAddr(pub [u8; 6]);

/// The well-known PAE group address, `01:80:C2:00:00:03` (IEEE 802.1X §7.8).
pub const PAE_GROUP_ADDR: MacAddr = MacAddr([0x01, 0x80, 0xC2, 0x00, 0x00, 0x03]);

impl MacAddr {
    /// Builds a per-port unique source MAC by adding `port_index` to the
    /// interface MAC, propagating carry over the low 6 bytes (spec.md §3,
    /// "Port (authenticator side)").
    #[must_use]
    pub fn derive_port_mac(if_mac: MacAddr, port_index: u8) -> MacAddr {
        let mut bytes = if_mac.0;
        let mut carry = u16::from(port_index);

        for byte in bytes.iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let sum = u16::from(*byte) + carry;
            *byte = (sum & 0xFF) as u8;
            carry = sum >> 8;
        }

        MacAddr(bytes)
    }

    /// Returns true if this address equals the PAE group address.
    #[must_use]
    pub fn is_pae_group(&self) -> bool {
        *self == PAE_GROUP_ADDR
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_port_mac_simple_offset() {
        let if_mac = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x00]);
        let port1 = MacAddr::derive_port_mac(if_mac, 1);
        assert_eq!(port1, MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x01]));
    }

    #[test]
    fn derive_port_mac_propagates_carry() {
        let if_mac = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0xFF]);
        let port1 = MacAddr::derive_port_mac(if_mac, 1);
        assert_eq!(port1, MacAddr([0x00, 0x11, 0x22, 0x33, 0x45, 0x00]));
    }

    #[test]
    fn pae_group_address_matches_spec() {
        assert_eq!(PAE_GROUP_ADDR.to_string(), "01:80:c2:00:00:03");
    }
}
