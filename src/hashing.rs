//! Hashing - SHA-256 digests for bundle reports
//!
//! Digests let a consumer confirm that an archive carries exactly the schema
//! and files that were reported.

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of bytes, return lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(sha256_hex(b"schema"), sha256_hex(b"schema"));
        assert_ne!(sha256_hex(b"schema"), sha256_hex(b"schema "));
    }
}
