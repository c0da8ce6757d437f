use docsign_core::checksum::CHECKSUM_LEN;
use docsign_core::{Checksum, fingerprint};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_fingerprint_is_deterministic(content in "\\PC*") {
        prop_assert_eq!(fingerprint(&content), fingerprint(content.clone()));
    }

    #[test]
    fn test_fingerprint_is_lowercase_hex(content in any::<Vec<u8>>()) {
        let checksum = fingerprint(&content);
        let text = checksum.as_str();

        prop_assert_eq!(text.len(), CHECKSUM_LEN);
        prop_assert!(text.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        // Every fingerprint parses back to itself
        prop_assert_eq!(Checksum::parse(text).unwrap(), checksum);
    }

    #[test]
    fn test_appending_changes_fingerprint(content in "\\PC*", extra in "\\PC+") {
        let original = fingerprint(&content);
        let edited = format!("{content}{extra}");

        prop_assert!(original.matches(&content));
        prop_assert!(!original.matches(&edited));
    }

    #[test]
    fn test_single_byte_edit_changes_fingerprint(
        mut content in proptest::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let original = fingerprint(&content);
        let i = index.index(content.len());
        content[i] ^= flip;

        prop_assert_ne!(fingerprint(&content), original);
    }

    #[test]
    fn test_uppercase_hex_is_rejected(content in "\\PC*") {
        let upper = fingerprint(&content).as_str().to_uppercase();
        // Only all-digit digests survive uppercasing unchanged
        prop_assume!(upper.chars().any(|c| c.is_ascii_alphabetic()));

        prop_assert!(Checksum::parse(upper).is_err());
    }
}
