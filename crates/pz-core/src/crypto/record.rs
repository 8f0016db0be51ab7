//! Authenticated encryption of a single secret value.
//!
//! An [`EncryptedRecord`] is the self-contained result of encrypting one
//! value: AES-256-GCM ciphertext (auth tag appended, per GCM convention),
//! the random salt fed to key derivation, and the random 96-bit nonce.
//! Records are immutable — changing a value always produces a new record
//! with a fresh salt and nonce. Reusing either across records would
//! weaken the authenticated-cipher guarantee and is forbidden.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::key::derive_key;
use super::{NONCE_LEN, SALT_LEN};
use crate::error::{PzError, Result};

/// One encrypted value: ciphertext + salt + iv.
///
/// Serializes as three base64 strings under the keys `ciphertext`, `salt`
/// and `iv` — the wire contract shared with the server and the web client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    ciphertext: Vec<u8>,
    salt: [u8; SALT_LEN],
    iv: [u8; NONCE_LEN],
}

impl EncryptedRecord {
    /// Encrypt a plaintext value under a password.
    ///
    /// Generates a fresh random salt and nonce, derives the key with
    /// PBKDF2, and seals the UTF-8 bytes with AES-256-GCM. No padding is
    /// applied; GCM is a stream construction and the companion web client
    /// expects the ciphertext byte-for-byte.
    pub fn encrypt(plaintext: &str, password: &str) -> Result<Self> {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let key = derive_key(password, &salt)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| PzError::Crypto(format!("Failed to initialize cipher: {}", e)))?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|e| PzError::Crypto(format!("Encryption failed: {}", e)))?;

        Ok(Self {
            ciphertext,
            salt,
            iv,
        })
    }

    /// Decrypt this record with a password.
    ///
    /// Re-derives the key from the stored salt, opens the ciphertext and
    /// verifies the authentication tag.
    ///
    /// # Errors
    ///
    /// Returns `PzError::DecryptionFailed` if tag verification fails or
    /// the plaintext is not valid UTF-8. The error deliberately does not
    /// distinguish a wrong password from corrupted ciphertext, and no
    /// partial output is ever returned.
    pub fn decrypt(&self, password: &str) -> Result<String> {
        let key = derive_key(password, &self.salt)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| PzError::Crypto(format!("Failed to initialize cipher: {}", e)))?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&self.iv), self.ciphertext.as_ref())
            .map_err(|_| PzError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| PzError::DecryptionFailed)
    }

    /// Reconstruct a record from its three base64 wire fields.
    pub fn from_base64(ciphertext: &str, salt: &str, iv: &str) -> Result<Self> {
        let ciphertext = BASE64
            .decode(ciphertext)
            .map_err(|e| PzError::MalformedInput(format!("Invalid ciphertext base64: {}", e)))?;
        let salt = BASE64
            .decode(salt)
            .map_err(|e| PzError::MalformedInput(format!("Invalid salt base64: {}", e)))?;
        let iv = BASE64
            .decode(iv)
            .map_err(|e| PzError::MalformedInput(format!("Invalid iv base64: {}", e)))?;

        let salt: [u8; SALT_LEN] = salt.try_into().map_err(|_| {
            PzError::MalformedInput(format!("Salt must be {} bytes", SALT_LEN))
        })?;
        let iv: [u8; NONCE_LEN] = iv.try_into().map_err(|_| {
            PzError::MalformedInput(format!("IV must be {} bytes", NONCE_LEN))
        })?;

        Ok(Self {
            ciphertext,
            salt,
            iv,
        })
    }

    /// Base64-encoded ciphertext, as stored in the server's `value` field.
    pub fn ciphertext_b64(&self) -> String {
        BASE64.encode(&self.ciphertext)
    }

    /// Base64-encoded salt.
    pub fn salt_b64(&self) -> String {
        BASE64.encode(self.salt)
    }

    /// Base64-encoded iv.
    pub fn iv_b64(&self) -> String {
        BASE64.encode(self.iv)
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8; NONCE_LEN] {
        &self.iv
    }

    #[cfg(test)]
    pub(crate) fn corrupt_ciphertext(&mut self, bit: usize) {
        self.ciphertext[bit / 8] ^= 1 << (bit % 8);
    }

    #[cfg(test)]
    pub(crate) fn corrupt_salt(&mut self, bit: usize) {
        self.salt[bit / 8] ^= 1 << (bit % 8);
    }

    #[cfg(test)]
    pub(crate) fn corrupt_iv(&mut self, bit: usize) {
        self.iv[bit / 8] ^= 1 << (bit % 8);
    }
}

#[derive(Serialize, Deserialize)]
struct WireRecord {
    ciphertext: String,
    salt: String,
    iv: String,
}

impl Serialize for EncryptedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireRecord {
            ciphertext: self.ciphertext_b64(),
            salt: self.salt_b64(),
            iv: self.iv_b64(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EncryptedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = WireRecord::deserialize(deserializer)?;
        EncryptedRecord::from_base64(&wire.ciphertext, &wire.salt, &wire.iv)
            .map_err(D::Error::custom)
    }
}
