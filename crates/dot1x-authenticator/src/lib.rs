//! 802.1X authenticator core: the port model, the four per-port FSMs
//! (spec.md §4.3-§4.6), the RADIUS client codec glue (spec.md §4.8/§4.9),
//! the tick-driven context that schedules them (spec.md §5), and the
//! management surface (spec.md §4.10).

pub mod context;
pub mod error;
pub mod fsm_backend;
pub mod fsm_eap_full;
pub mod fsm_pae;
pub mod fsm_reauth;
pub mod mgmt;
pub mod port;
pub mod radius;
pub mod state;

pub use context::AuthenticatorContext;
pub use error::{ManagementError, Result};
pub use port::Port;
