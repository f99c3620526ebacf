//! Admin Credential Check
//!
//! A single shared secret, stored as a SHA-256 digest, gates the read-only
//! admin view and export. No salt, no rate limiting, no lockout: the blast
//! radius is visibility of non-sensitive roster data, so this is deliberately
//! not a security boundary.

use sha2::{Digest, Sha256};
use tracing::debug;

/// Lowercase-hex SHA-256 of a secret.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compare a candidate secret against the stored digest.
pub fn verify_password(candidate: &str, stored_digest: &str) -> bool {
    let ok = hash_password(candidate) == stored_digest.to_lowercase();
    if !ok {
        debug!("Admin credential check failed");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_hex_sha256() {
        // SHA-256("abc"), the FIPS 180-2 test vector.
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_accepts_matching_secret() {
        let digest = hash_password("mobadr90");
        assert!(verify_password("mobadr90", &digest));
        assert!(verify_password("mobadr90", &digest.to_uppercase()));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let digest = hash_password("mobadr90");
        assert!(!verify_password("mobadr91", &digest));
        assert!(!verify_password("", &digest));
    }
}
