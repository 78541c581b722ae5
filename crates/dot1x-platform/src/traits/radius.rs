//! RADIUS UDP transport trait (spec.md §4.8, §4.9).

use async_trait::async_trait;
use dot1x_types::Result;
use std::time::Duration;

/// Provider for the RADIUS client's UDP transport to a single configured
/// server. Retransmission and timeout policy live in the backend FSM;
/// this trait only moves datagrams.
#[async_trait]
pub trait RadiusTransport: Send + Sync {
    /// Sends one RADIUS packet (already encoded) to the configured server.
    async fn send(&self, packet: &[u8]) -> Result<()>;

    /// Waits up to `timeout` for a response datagram. Returns `Ok(None)`
    /// on timeout rather than an error, since a missing response is a
    /// normal retransmission trigger (spec.md §4.6), not a fault.
    async fn recv_timeout(&self, timeout: Duration) -> Result<Option<Vec<u8>>>;
}
