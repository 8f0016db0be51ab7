//! Password-based encryption scheme shared with the Pastezen web client.
//!
//! Every encrypted secret value is a self-contained record: AES-256-GCM
//! ciphertext plus the random salt and nonce used to produce it. Keys are
//! never stored; they are re-derived at read time from the password and
//! the salt carried alongside the ciphertext.
//!
//! The concrete scheme (PBKDF2-HMAC-SHA256 at 100,000 iterations feeding
//! AES-256-GCM, everything base64 on the wire) is a cross-client contract:
//! the server and the web frontend reproduce it byte for byte.

pub mod key;
pub mod record;

pub use key::{derive_key, DerivedKey};
pub use record::EncryptedRecord;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes (96-bit).
pub const NONCE_LEN: usize = 12;

/// Derived key length in bytes (256-bit AES key).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count. Fixed by the wire contract; changing it would
/// break decryption on every other client.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
