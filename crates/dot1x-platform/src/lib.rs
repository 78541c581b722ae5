//! # dot1x-platform
//!
//! Platform abstraction layer for the 802.1X authenticator and
//! supplicant: the raw PAE link, the RADIUS UDP transport, and the switch
//! driver are all external collaborators (spec.md §1), so this crate only
//! declares the traits the rest of the workspace programs against. A
//! real backend (raw AF_PACKET socket, a vendor switch SDK, ...) lives
//! outside this workspace and implements them; `stub` provides in-memory
//! stand-ins used by tests.

pub mod stub;
pub mod traits;

pub use traits::{PaeLinkProvider, RadiusTransport, SwitchDriver};
