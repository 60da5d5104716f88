//! Cryptographic utilities for refresh-token storage
//!
//! Refresh tokens are never stored at rest. The ledger keeps a SHA-256
//! hash of the currently valid refresh token and compares candidates in
//! constant time, so a read of the persistence store yields nothing a
//! client could replay, and verification leaks no timing signal.
//!
//! SHA-256 (rather than a slow password hash) is sufficient here: refresh
//! tokens are signed JWTs with high-entropy signatures and short lifetimes,
//! so offline guessing is not a realistic attack. Passwords, which are
//! low-entropy, go through argon2 in the password service instead.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hash a token for storage at rest.
///
/// Deterministic, so the stored value can be compared against a recomputed
/// hash without keeping the original token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Verify a token against a stored hash in constant time.
///
/// Returns `false` on any mismatch, including malformed stored hashes.
pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
    let computed_hash = hash_token(token);
    constant_time_compare(computed_hash.as_bytes(), stored_hash.as_bytes())
}

/// Constant-time comparison of two byte slices.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_token() {
        let token = "refresh_token_12345";
        let hash = hash_token(token);

        assert!(verify_token_hash(token, &hash));
        assert!(!verify_token_hash("wrong_token", &hash));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let token = "refresh_token";
        assert_eq!(hash_token(token), hash_token(token));
    }

    #[test]
    fn test_hash_produces_hex_string() {
        let hash = hash_token("refresh_token");

        // SHA256 produces 32 bytes = 64 hex chars
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_tokens_produce_different_hashes() {
        assert_ne!(hash_token("token_a"), hash_token("token_b"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"hello", b"hello"));
        assert!(constant_time_compare(b"", b""));
        assert!(!constant_time_compare(b"hello", b"world"));
        assert!(!constant_time_compare(b"short", b"longer_string"));
    }
}
