//! Raw PAE link provider trait (spec.md §1, §4.1).

use async_trait::async_trait;
use dot1x_types::mac::MacAddr;
use dot1x_types::Result;

/// Provider for sending and receiving raw Ethernet frames on a port's PAE
/// socket. Implementations bind to the PAE group address plus the port's
/// own unicast address and do not filter by EtherType themselves; the
/// codec layer in `dot1x-codec` does that.
#[async_trait]
pub trait PaeLinkProvider: Send + Sync {
    /// The port's own unicast MAC address.
    fn local_mac(&self) -> MacAddr;

    /// Sends a complete Ethernet frame (header included).
    async fn send_frame(&self, frame: &[u8]) -> Result<()>;

    /// Receives the next Ethernet frame addressed to the PAE group or this
    /// port's unicast address. Blocks until one arrives.
    async fn recv_frame(&self) -> Result<Vec<u8>>;
}
