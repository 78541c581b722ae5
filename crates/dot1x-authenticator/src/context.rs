//! Authenticator context: owns every port, drives the per-port fixpoint
//! scheduler on a 1Hz tick, and demultiplexes the single RADIUS transport
//! across them (spec.md §5, §4.8/§4.9).

use crate::fsm_backend;
use crate::fsm_eap_full;
use crate::fsm_pae;
use crate::fsm_reauth;
use crate::port::Port;
use crate::radius::{build_access_request, validate_response, AccessRequestParams};
use dot1x_codec::eap::decode_eap_packet;
use dot1x_codec::eapol::{decode_eapol_frame, encode_eapol_frame, EapolRxEvent};
use dot1x_types::config::RadiusServerConfig;
use dot1x_types::eap::EapCode;
use dot1x_types::eapol::EapolPacketType;
use dot1x_types::mac::MacAddr;
use dot1x_types::stats::PortForwardingState;
use dot1x_platform::{PaeLinkProvider, RadiusTransport, SwitchDriver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// One port's wire link paired with the FSM state it drives.
struct PortHandle {
    port: Mutex<Port>,
    link: Arc<dyn PaeLinkProvider>,
}

/// The running authenticator for one bridge/switch: every port, the
/// shared switch driver, and the shared RADIUS transport (spec.md §3,
/// "Authenticator context").
pub struct AuthenticatorContext {
    ports: Vec<PortHandle>,
    switch: Arc<dyn SwitchDriver>,
    radius_transport: Arc<dyn RadiusTransport>,
    radius_cfg: RadiusServerConfig,
    ifname: String,
    bridge_mac: MacAddr,
}

impl AuthenticatorContext {
    /// Builds a context over an already-constructed set of ports and
    /// their links.
    #[must_use]
    pub fn new(
        ports: Vec<(Port, Arc<dyn PaeLinkProvider>)>,
        switch: Arc<dyn SwitchDriver>,
        radius_transport: Arc<dyn RadiusTransport>,
        radius_cfg: RadiusServerConfig,
        ifname: String,
        bridge_mac: MacAddr,
    ) -> Self {
        Self {
            ports: ports
                .into_iter()
                .map(|(port, link)| PortHandle {
                    port: Mutex::new(port),
                    link,
                })
                .collect(),
            switch,
            radius_transport,
            radius_cfg,
            ifname,
            bridge_mac,
        }
    }

    /// Installs the PAE filter on every port (spec.md §4.1: "on start").
    pub async fn start(&self) -> dot1x_types::Result<()> {
        for (index, handle) in self.ports.iter().enumerate() {
            self.switch.install_pae_filter(index as u32).await?;
            let status = handle.port.lock().await.auth_port_status;
            self.switch
                .set_port_state(index as u32, PortForwardingState::from(status))
                .await?;
        }
        Ok(())
    }

    /// Removes the PAE filter from every port (spec.md §4.1: "on stop").
    pub async fn stop(&self) -> dot1x_types::Result<()> {
        for index in 0..self.ports.len() {
            self.switch.remove_pae_filter(index as u32).await?;
        }
        Ok(())
    }

    /// Runs the context forever: one receive loop per port, one RADIUS
    /// receive loop, and the 1Hz tick that drives every FSM (spec.md §5).
    /// Each sub-loop runs as its own task against a shared `Arc`, the way
    /// the daemon's scheduler and executor run side by side against
    /// shared state.
    pub async fn run(self: Arc<Self>) -> dot1x_types::Result<()> {
        let mut tasks = tokio::task::JoinSet::new();

        for index in 0..self.ports.len() {
            let context = Arc::clone(&self);
            tasks.spawn(async move { context.port_recv_loop(index).await });
        }
        {
            let context = Arc::clone(&self);
            tasks.spawn(async move { context.radius_recv_loop().await });
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

    async fn port_recv_loop(&self, index: usize) -> dot1x_types::Result<()> {
        let handle = &self.ports[index];
        loop {
            let frame = handle.link.recv_frame().await?;
            self.ingest_frame(index, handle, &frame).await;
        }
    }

    async fn ingest_frame(&self, index: usize, handle: &PortHandle, frame: &[u8]) {
        let mut port = handle.port.lock().await;
        match decode_eapol_frame(frame, handle.link.local_mac()) {
            EapolRxEvent::Accepted { eth, frame } => {
                port.stats.eapol_frames_rx += 1;
                port.supplicant_mac.get_or_insert(eth.src);
                match frame.packet_type {
                    EapolPacketType::Start => {
                        port.stats.eapol_start_frames_rx += 1;
                        port.eapol_start_received = true;
                    }
                    EapolPacketType::Logoff => {
                        port.stats.eapol_logoff_frames_rx += 1;
                        port.eapol_logoff_received = true;
                    }
                    EapolPacketType::Eap => {
                        let Some(eap) = decode_eap_packet(&frame.body) else {
                            port.stats.eap_length_error_frames_rx += 1;
                            return;
                        };
                        if eap.code == EapCode::Response {
                            port.stats.eapol_resp_frames_rx += 1;
                            port.rx_eap_type_data = Some(eap.type_data);
                            port.rx_eap_code_is_response = true;
                        }
                    }
                    _ => {}
                }
            }
            EapolRxEvent::Dropped(reason) => {
                tracing::debug!(port = index, ?reason, "dropped frame");
                port.stats.invalid_eapol_frames_rx += 1;
            }
        }
    }

    async fn radius_recv_loop(&self) -> dot1x_types::Result<()> {
        loop {
            let Some(raw) = self
                .radius_transport
                .recv_timeout(Duration::from_secs(1))
                .await?
            else {
                continue;
            };
            if raw.len() < 2 {
                continue;
            }
            let identifier = raw[1];
            for handle in &self.ports {
                let mut port = handle.port.lock().await;
                if port.aaa_req_id != Some(identifier) {
                    continue;
                }
                let Some(validated) = validate_response(
                    &raw,
                    port.aaa_req_authenticator,
                    &self.radius_cfg.shared_secret,
                ) else {
                    continue;
                };
                apply_radius_response(&mut port, validated);
                break;
            }
        }
    }

    async fn tick_loop(&self) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            for (index, handle) in self.ports.iter().enumerate() {
                self.tick_port(index, handle).await;
            }
        }
    }

    async fn tick_port(&self, index: usize, handle: &PortHandle) {
        let mut port = handle.port.lock().await;
        decrement_timers(&mut port);
        self.settle_port(index, handle, &mut port).await;
    }

    /// Runs the fixpoint FSM sweep and applies its side effects: a switch
    /// port-state sync, a queued EAP frame send, and an AAA dispatch. Shared
    /// by the 1Hz tick and by [`Self::with_port`], so a management mutation
    /// takes effect immediately rather than waiting for the next tick.
    async fn settle_port(&self, index: usize, handle: &PortHandle, port: &mut Port) {
        let previous_status = port.auth_port_status;
        run_fixpoint(port);

        if port.auth_port_status != previous_status {
            if let Err(error) = self
                .switch
                .set_port_state(index as u32, PortForwardingState::from(port.auth_port_status))
                .await
            {
                tracing::warn!(port = index, %error, "failed to update switch port state");
            }
        }

        if let Some(eap_bytes) = port.tx_eap_packet.take() {
            let frame = encode_eapol_frame(handle.link.local_mac(), EapolPacketType::Eap, &eap_bytes);
            if let Err(error) = handle.link.send_frame(&frame).await {
                tracing::warn!(port = index, %error, "failed to send EAP frame");
            } else {
                port.stats.eapol_frames_tx += 1;
            }
        }

        if matches!(port.eap_full_state, crate::state::EapFullState::AaaRequest)
            && port.aaa_req_id.is_none()
        {
            self.dispatch_access_request(index, port).await;
        }
    }

    async fn dispatch_access_request(&self, index: usize, port: &mut Port) {
        let identifier = self.allocate_radius_identifier(index).await;
        let req_authenticator = dot1x_crypto::random_authenticator();
        let params = AccessRequestParams {
            identifier,
            req_authenticator,
            port_index: index as u32,
            ifname: &self.ifname,
            nas_ip: self.radius_cfg.server_addr,
            bridge_mac: self.bridge_mac,
            supplicant_mac: port.supplicant_mac.unwrap_or(MacAddr([0; 6])),
            identity: port.identity.as_deref().unwrap_or(&[]),
            eap_packet: &port.aaa_req_eap_packet,
            server_state: &port.server_state,
            shared_secret: &self.radius_cfg.shared_secret,
        };
        let raw = build_access_request(&params);
        if let Err(error) = self.radius_transport.send(&raw).await {
            tracing::warn!(port = index, %error, "failed to send Access-Request");
            return;
        }
        port.aaa_req_id = Some(identifier);
        port.aaa_req_authenticator = req_authenticator;
    }

    /// Runs `f` against the port at `index` while its lock is held — the
    /// synchronization point the management setters in [`crate::mgmt`] use,
    /// and the hook external callers (e.g. a hosting daemon) use to read
    /// port state without exposing the lock itself.
    pub async fn with_port<R>(
        &self,
        index: u32,
        f: impl FnOnce(&mut Port) -> R,
    ) -> crate::Result<R> {
        let handle = self
            .ports
            .get(index as usize)
            .ok_or(crate::ManagementError::InvalidPort { index })?;
        let mut port = handle.port.lock().await;
        let result = f(&mut port);
        self.settle_port(index as usize, handle, &mut port).await;
        Ok(result)
    }

    /// Number of ports this context manages.
    #[must_use]
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    async fn allocate_radius_identifier(&self, exclude: usize) -> u8 {
        let mut in_flight = [false; 256];
        for (other_index, handle) in self.ports.iter().enumerate() {
            if other_index == exclude {
                continue;
            }
            if let Some(id) = handle.port.lock().await.aaa_req_id {
                in_flight[usize::from(id)] = true;
            }
        }
        (0..=u8::MAX).find(|id| !in_flight[usize::from(*id)]).unwrap_or(0)
    }
}

/// Steps every per-port FSM until none report a change.
fn run_fixpoint(port: &mut Port) {
    loop {
        let mut busy = fsm_pae::step(port);
        busy |= fsm_backend::step(port);
        busy |= fsm_reauth::step(port);
        busy |= fsm_eap_full::step(port);
        if !busy {
            break;
        }
    }
}

fn decrement_timers(port: &mut Port) {
    port.quiet_while = port.quiet_while.saturating_sub(1);
    port.reauth_when = port.reauth_when.saturating_sub(1);
    port.a_while = port.a_while.saturating_sub(1);
    port.retrans_while = port.retrans_while.saturating_sub(1);
}

fn apply_radius_response(port: &mut Port, validated: crate::radius::ValidatedResponse) {
    use dot1x_types::radius::RadiusCode;

    port.server_state = validated.state;
    match validated.code {
        RadiusCode::AccessAccept => {
            port.aaa_success = true;
        }
        RadiusCode::AccessReject => {
            port.aaa_fail = true;
        }
        RadiusCode::AccessChallenge => {
            port.tx_eap_packet = Some(validated.eap_packet);
            port.aaa_eap_req = true;
        }
        RadiusCode::AccessRequest => {}
    }
    port.aaa_req_id = None;
}
