//! Switch/bridge driver trait (spec.md §1, §4.4, §4.8).

use async_trait::async_trait;
use dot1x_types::stats::PortForwardingState;
use dot1x_types::Result;

/// Provider for the two switch-level side effects the authenticator
/// depends on: setting a port's forwarding state, and pinning the PAE
/// group MAC to the CPU port for the lifetime of 802.1X on that port
/// (spec.md §1: "to pin the PAE group MAC to the CPU port and to set port
/// forwarding state").
#[async_trait]
pub trait SwitchDriver: Send + Sync {
    /// Sets the forwarding state of the given port index.
    async fn set_port_state(&self, port_index: u32, state: PortForwardingState) -> Result<()>;

    /// Installs the CPU-port filter for the PAE group MAC on the given
    /// port (spec.md §4.1: "install the NIC/switch filter"). Called on
    /// port start.
    async fn install_pae_filter(&self, port_index: u32) -> Result<()>;

    /// Removes the filter installed by [`install_pae_filter`]
    /// (spec.md §4.1: "on stop must remove it").
    ///
    /// [`install_pae_filter`]: SwitchDriver::install_pae_filter
    async fn remove_pae_filter(&self, port_index: u32) -> Result<()>;
}
