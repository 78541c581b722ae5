//! Platform-trait stand-ins for the standalone `run` commands, used
//! until a real raw-socket / RADIUS-UDP backend is wired in (spec.md §1:
//! "the socket/NIC drivers" and the RADIUS server are out of scope; only
//! the interfaces are specified).

use async_trait::async_trait;
use dot1x_platform::{PaeLinkProvider, RadiusTransport};
use dot1x_types::mac::MacAddr;
use dot1x_types::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

/// A `PaeLinkProvider` with no peer. Modeled on
/// `dot1x_platform::stub::ChannelPaeLink`, minus the second endpoint:
/// frames sent here have nowhere to go, and none ever arrive.

pub struct IdleLink {
    mac: MacAddr,
    _keep_alive: mpsc::UnboundedSender<Vec<u8>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl IdleLink {
    #[must_use]
    pub fn new(mac: MacAddr) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            mac,
            _keep_alive: tx,
            rx: Mutex::new(rx),
        }
    }
}

#[async_trait]
impl PaeLinkProvider for IdleLink {
    fn local_mac(&self) -> MacAddr {
        self.mac
    }

    async fn send_frame(&self, _frame: &[u8]) -> Result<()> {
        tracing::trace!("dropping outbound frame: no NIC backend wired up yet");
        Ok(())
    }

    async fn recv_frame(&self) -> Result<Vec<u8>> {
        let mut rx = self.rx.lock().await;
        match rx.recv().await {
            Some(frame) => Ok(frame),
            None => std::future::pending().await,
        }
    }
}

/// A `RadiusTransport` with no server on the other end: sends are
/// accepted and discarded, and every wait times out, which the backend
/// FSM already treats as a normal retransmission trigger (spec.md §4.6).
pub struct IdleRadiusTransport;

#[async_trait]
impl RadiusTransport for IdleRadiusTransport {
    async fn send(&self, _packet: &[u8]) -> Result<()> {
        tracing::trace!("dropping RADIUS request: no RADIUS transport wired up yet");
        Ok(())
    }

    async fn recv_timeout(&self, timeout: Duration) -> Result<Option<Vec<u8>>> {
        tokio::time::sleep(timeout).await;
        Ok(None)
    }
}
