//! Credential hashing and verification
//!
//! The stored credential is the lowercase hex SHA-256 digest of the secret
//! and the per-account salt joined by a single `:` byte. Hashing operates
//! on raw bytes, so secrets and salts containing non-ASCII data verify
//! correctly.

use sha2::{Digest, Sha256};

use crate::account::Account;

/// Compute the stored digest for a secret and salt.
pub fn hash_secret(secret: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Recompute the digest for `secret` with the account's salt and compare it
/// to the stored hash.
pub fn verify_secret(secret: &str, account: &Account) -> bool {
    hash_secret(secret, &account.salt) == account.password_hash
}
