//! In-memory stand-ins for the platform traits, used by tests in the
//! authenticator/supplicant crates and as a fallback before a real
//! raw-socket backend is wired in (mirrors the `Stub*Provider` pattern).

use crate::traits::{PaeLinkProvider, RadiusTransport, SwitchDriver};
use async_trait::async_trait;
use dot1x_types::mac::MacAddr;
use dot1x_types::stats::PortForwardingState;
use dot1x_types::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// A loopback PAE link backed by a pair of `tokio` channels, letting tests
/// wire an authenticator and a supplicant together without a real NIC.
pub struct ChannelPaeLink {
    local_mac: MacAddr,
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl ChannelPaeLink {
    /// Creates a connected pair of links, as if joined by a single wire.
    #[must_use]
    pub fn pair(mac_a: MacAddr, mac_b: MacAddr) -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        (
            Self {
                local_mac: mac_a,
                tx: tx_b,
                rx: Mutex::new(rx_a),
            },
            Self {
                local_mac: mac_b,
                tx: tx_a,
                rx: Mutex::new(rx_b),
            },
        )
    }
}

#[async_trait]
impl PaeLinkProvider for ChannelPaeLink {
    fn local_mac(&self) -> MacAddr {
        self.local_mac
    }

    async fn send_frame(&self, frame: &[u8]) -> Result<()> {
        self.tx
            .send(frame.to_vec())
            .map_err(|_| dot1x_types::Error::resource("peer link closed"))
    }

    async fn recv_frame(&self) -> Result<Vec<u8>> {
        let mut rx = self.rx.lock().expect("lock not poisoned");
        rx.recv()
            .await
            .ok_or_else(|| dot1x_types::Error::resource("peer link closed"))
    }
}

/// A `SwitchDriver` that records state transitions in memory instead of
/// touching real hardware.
#[derive(Default)]
pub struct MemorySwitchDriver {
    state: Mutex<HashMap<u32, PortForwardingState>>,
    filters: Mutex<HashMap<u32, bool>>,
}

impl MemorySwitchDriver {
    /// Returns the last forwarding state set for `port_index`, if any.
    #[must_use]
    pub fn state_of(&self, port_index: u32) -> Option<PortForwardingState> {
        self.state.lock().expect("lock not poisoned").get(&port_index).copied()
    }

    /// Returns whether the PAE filter is currently installed on `port_index`.
    #[must_use]
    pub fn filter_installed(&self, port_index: u32) -> bool {
        self.filters
            .lock()
            .expect("lock not poisoned")
            .get(&port_index)
            .copied()
            .unwrap_or(false)
    }
}

#[async_trait]
impl SwitchDriver for MemorySwitchDriver {
    async fn set_port_state(&self, port_index: u32, state: PortForwardingState) -> Result<()> {
        self.state.lock().expect("lock not poisoned").insert(port_index, state);
        Ok(())
    }

    async fn install_pae_filter(&self, port_index: u32) -> Result<()> {
        self.filters.lock().expect("lock not poisoned").insert(port_index, true);
        Ok(())
    }

    async fn remove_pae_filter(&self, port_index: u32) -> Result<()> {
        self.filters.lock().expect("lock not poisoned").insert(port_index, false);
        Ok(())
    }
}

/// A `RadiusTransport` backed by an in-memory queue, for tests that stand
/// in a canned server response.
pub struct QueueRadiusTransport {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    inbound: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl QueueRadiusTransport {
    /// Creates a transport and the channel endpoints a test driver uses to
    /// observe requests and inject responses.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>, mpsc::UnboundedSender<Vec<u8>>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (
            Self {
                outbound: out_tx,
                inbound: Mutex::new(in_rx),
            },
            out_rx,
            in_tx,
        )
    }
}

#[async_trait]
impl RadiusTransport for QueueRadiusTransport {
    async fn send(&self, packet: &[u8]) -> Result<()> {
        self.outbound
            .send(packet.to_vec())
            .map_err(|_| dot1x_types::Error::resource("radius test harness closed"))
    }

    async fn recv_timeout(&self, timeout: Duration) -> Result<Option<Vec<u8>>> {
        let mut rx = self.inbound.lock().expect("lock not poisoned");
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(packet)) => Ok(Some(packet)),
            Ok(None) => Err(dot1x_types::Error::resource("radius test harness closed")),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_pae_link_delivers_frames_both_ways() {
        let mac_a = MacAddr([0, 0, 0, 0, 0, 1]);
        let mac_b = MacAddr([0, 0, 0, 0, 0, 2]);
        let (a, b) = ChannelPaeLink::pair(mac_a, mac_b);

        a.send_frame(&[1, 2, 3]).await.unwrap();
        assert_eq!(b.recv_frame().await.unwrap(), vec![1, 2, 3]);

        b.send_frame(&[9, 9]).await.unwrap();
        assert_eq!(a.recv_frame().await.unwrap(), vec![9, 9]);
    }

    #[tokio::test]
    async fn memory_switch_driver_tracks_latest_state() {
        let driver = MemorySwitchDriver::default();
        assert_eq!(driver.state_of(1), None);
        driver.set_port_state(1, PortForwardingState::Blocking).await.unwrap();
        assert_eq!(driver.state_of(1), Some(PortForwardingState::Blocking));
        driver.set_port_state(1, PortForwardingState::Forwarding).await.unwrap();
        assert_eq!(driver.state_of(1), Some(PortForwardingState::Forwarding));
    }

    #[tokio::test]
    async fn memory_switch_driver_tracks_filter_install_and_remove() {
        let driver = MemorySwitchDriver::default();
        assert!(!driver.filter_installed(3));
        driver.install_pae_filter(3).await.unwrap();
        assert!(driver.filter_installed(3));
        driver.remove_pae_filter(3).await.unwrap();
        assert!(!driver.filter_installed(3));
    }

    #[tokio::test]
    async fn queue_radius_transport_recv_timeout_returns_none_on_timeout() {
        let (transport, _out_rx, _in_tx) = QueueRadiusTransport::new();
        let result = transport.recv_timeout(Duration::from_millis(10)).await.unwrap();
        assert_eq!(result, None);
    }
}
