//! Legacy-Nak construction (spec.md §4.2: "build a Legacy-Nak response
//! listing locally-acceptable methods in order, with a single zero byte
//! if none").

use dot1x_types::eap::EapType;

/// Builds the type-data for an EAP-Response/Nak listing the locally
/// acceptable method types, in order. If `acceptable` is empty, the
/// response carries a single zero byte per spec.md §5 edge case 1.
#[must_use]
pub fn build_legacy_nak(acceptable: &[EapType]) -> Vec<u8> {
    if acceptable.is_empty() {
        return vec![0];
    }
    acceptable.iter().map(|t| t.as_u8()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_acceptable_methods_in_order() {
        let nak = build_legacy_nak(&[EapType::Md5Challenge, EapType::Tls]);
        assert_eq!(nak, vec![4, 13]);
    }

    #[test]
    fn empty_acceptable_list_yields_single_zero_byte() {
        assert_eq!(build_legacy_nak(&[]), vec![0]);
    }
}
