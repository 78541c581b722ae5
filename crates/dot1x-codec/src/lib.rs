//! Wire codecs for EAPOL, EAP, and RADIUS (spec.md §3, §4.1, §4.8, §4.9).
//!
//! Mirrors the split in `netdiag-capture`: pure `&[u8] -> T` / `T ->
//! Vec<u8>` functions with no I/O of their own. The platform crate owns the
//! sockets; this crate only knows how to read and write their bytes.

pub mod eap;
pub mod eapol;
pub mod radius;

pub use eap::{build_canned, decode_eap_packet, encode_eap_packet, next_id};
pub use eapol::{decode_eapol_frame, encode_eapol_frame, EapolDropReason, EapolRxEvent, EthernetHeader};
pub use radius::{
    chunk_eap_message, decode_radius_packet, encode_radius_packet, sign_access_request,
    verify_response_authenticator, RadiusDecodeError,
};
