//! Error types for pz core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for pz operations.
pub type Result<T> = std::result::Result<T, PzError>;

/// Core error type for pz operations.
#[derive(Debug, Error)]
pub enum PzError {
    /// The resource is password-protected and was fetched without
    /// credentials. Recovered locally by the single unlock retry in
    /// [`crate::protocol::fetch_protected`]; only surfaced when the
    /// retry itself fails.
    #[error("Access denied: resource is password protected")]
    AccessDenied,

    /// Authentication-tag mismatch or non-UTF-8 plaintext after decrypt.
    /// Deliberately does not distinguish a wrong password from corrupted
    /// ciphertext.
    #[error("Decryption failed: invalid password or corrupted data")]
    DecryptionFailed,

    /// A private project was read or written without a password.
    #[error("Password required for private project")]
    MissingPassword,

    /// Malformed user input, rejected before any network call
    #[error("Invalid input: {0}")]
    MalformedInput(String),

    /// Resource or key not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Collaborator store (transport/server) error
    #[error("Store error: {0}")]
    Store(String),

    /// Cryptographic parameter error, distinct from a failed
    /// authenticated decrypt
    #[error("Crypto error: {0}")]
    Crypto(String),
}
