//! # pz Core
//!
//! Core library for pz - the Pastezen CLI for secure code sharing and
//! secrets management.
//!
//! This crate provides the password-based encryption scheme, the
//! encrypted-secret data model and the protected-resource access protocol
//! independent of the CLI interface. It performs no networking and no
//! terminal I/O; the HTTP store and the interactive prompts are
//! collaborators plugged in through the traits and closures defined here.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation and AES-256-GCM entry records
//! - **project**: secret projects, entries and their wire shapes
//! - **secrets**: key-level operations on one project's entry collection
//! - **protocol**: optimistic fetch with a single password-gated retry
//! - **envfile**: `.env` text codec for bulk import/export

pub mod crypto;
pub mod envfile;
pub mod error;
pub mod project;
pub mod protocol;
pub mod secrets;

pub use crypto::EncryptedRecord;
pub use error::{PzError, Result};
pub use project::{SecretEntry, SecretProject, Visibility};
pub use protocol::{fetch_protected, Access, ProtectedResource};
pub use secrets::{PlaintextView, SecretSet, SecretValue};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
