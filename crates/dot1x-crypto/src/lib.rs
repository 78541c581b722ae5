//! Cryptographic primitives used by the RADIUS client and EAP-MD5
//! (spec.md §1: "the HMAC-MD5 implementation, the PRNG" are external
//! collaborators; this crate is the thin wrapper around them that the
//! rest of the workspace calls through).

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use rand::RngCore;

/// Computes the plain MD5 digest of `data` (RFC 1321).
#[must_use]
pub fn md5(data: &[u8]) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes HMAC-MD5(`key`, `data`) (RFC 2104), used for the RADIUS
/// `Message-Authenticator` attribute (spec.md §4.8/§4.9).
#[must_use]
pub fn hmac_md5(key: &[u8], data: &[u8]) -> [u8; 16] {
    let mut mac =
        Hmac::<Md5>::new_from_slice(key).expect("HMAC-MD5 accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Fills `buf` with cryptographically random bytes, used to draw a fresh
/// `reqAuthenticator` for each new Access-Request (spec.md §3 invariants).
pub fn fill_random(buf: &mut [u8]) {
    rand::thread_rng().fill_bytes(buf);
}

/// Draws a fresh 16-byte RADIUS Request Authenticator.
#[must_use]
pub fn random_authenticator() -> [u8; 16] {
    let mut buf = [0u8; 16];
    fill_random(&mut buf);
    buf
}

/// Computes the EAP-MD5-Challenge response hash: `MD5(identifier ||
/// password || challenge)` (RFC 3748 §5.4 / CycloneEAP `eap_md5.c`).
#[must_use]
pub fn md5_challenge_response(identifier: u8, password: &[u8], challenge: &[u8]) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update([identifier]);
    hasher.update(password);
    hasher.update(challenge);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_of_empty_string_matches_known_vector() {
        let digest = md5(b"");
        assert_eq!(
            digest,
            [
                0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04, 0xe9, 0x80, 0x09, 0x98, 0xec,
                0xf8, 0x42, 0x7e
            ]
        );
    }

    #[test]
    fn hmac_md5_is_deterministic() {
        let a = hmac_md5(b"secret", b"packet-bytes");
        let b = hmac_md5(b"secret", b"packet-bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn hmac_md5_depends_on_key() {
        let a = hmac_md5(b"secret-one", b"packet-bytes");
        let b = hmac_md5(b"secret-two", b"packet-bytes");
        assert_ne!(a, b);
    }

    #[test]
    fn random_authenticator_is_not_all_zero() {
        // Vanishingly unlikely to fail unless the RNG is broken.
        let a = random_authenticator();
        assert_ne!(a, [0u8; 16]);
    }
}
