//! Hashing utilities
//!
//! Snapshot fingerprints are Blake3 digests of the serialized record set,
//! hex-encoded. Every consumer must use the same algorithm to compare them.

use crate::types::Hash;

/// Compute Blake3 hash
pub fn hash(data: &[u8]) -> Hash {
    let hash = blake3::hash(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(hash.as_bytes());
    result
}

/// Hash to hex string
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Hex fingerprint of a byte string
pub fn fingerprint(data: &[u8]) -> String {
    hash_to_hex(&hash(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_functions() {
        let h = hash(b"test data");
        assert_eq!(hash_to_hex(&h), fingerprint(b"test data"));
        assert_eq!(h, *blake3::hash(b"test data").as_bytes());
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint(b"{}");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(fp, fingerprint(b"{}"));
        assert_ne!(fp, fingerprint(b"[]"));
    }
}
