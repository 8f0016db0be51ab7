//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Derives a 256-bit AES key from a user password and a per-record salt.
//! The parameters (SHA-256 PRF, 100,000 iterations) are fixed by the
//! cross-client wire contract and must not be tuned independently.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use super::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::{PzError, Result};

/// A symmetric key derived from a password.
///
/// Key material is zeroized when the value is dropped, and the `Debug`
/// representation never exposes the bytes.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value; use it only for the immediate
    /// cipher operation.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password and salt.
///
/// Deterministic: the same `(password, salt)` pair always yields the same
/// key. This is required because keys are never persisted — decryption
/// re-derives the key from the salt stored with the ciphertext.
///
/// # Errors
///
/// Returns `PzError::Crypto` if the password is empty. The salt length is
/// enforced by the type.
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(PzError::Crypto("password cannot be empty".to_string()));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);

    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = *b"unique-salt-16by";

    #[test]
    fn test_key_derivation_deterministic() {
        let key1 = derive_key("test-password", &SALT).unwrap();
        let key2 = derive_key("test-password", &SALT).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let other_salt: [u8; SALT_LEN] = *b"another-salt-16b";

        let key1 = derive_key("test-password", &SALT).unwrap();
        let key2 = derive_key("test-password", &other_salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let key1 = derive_key("password-one", &SALT).unwrap();
        let key2 = derive_key("password-two", &SALT).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = derive_key("", &SALT);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("password cannot be empty"));
    }

    #[test]
    fn test_key_length() {
        let key = derive_key("test-password", &SALT).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("test-password", &SALT).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
