//! Password and confirmation prompts.

use std::io::IsTerminal;

use dialoguer::{Confirm, Password};
use pz_core::PzError;

/// Environment variable consulted before any interactive password prompt.
pub const PASSWORD_ENV: &str = "PZ_PASSWORD";

/// Resolve a password for a protected resource, in precedence order:
/// `--password` flag, `PZ_PASSWORD`, interactive prompt (asked exactly
/// once). Used as the password source of a protected fetch, so it only
/// runs when the resource actually turns out to be locked.
pub fn resolve_password(flag: Option<&str>, prompt: &str) -> pz_core::Result<String> {
    if let Some(value) = flag {
        return Ok(value.to_string());
    }
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    if !std::io::stdin().is_terminal() {
        return Err(PzError::MissingPassword);
    }
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|_| PzError::MissingPassword)
}

/// Prompt for a new password with confirmation (project/paste creation).
pub fn new_password(prompt: &str) -> anyhow::Result<String> {
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Ask before a destructive action. `force` skips the question, and a
/// non-interactive session without `force` refuses rather than assumes.
pub fn confirm_destructive(message: &str, force: bool) -> anyhow::Result<bool> {
    if force {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("Refusing to delete without confirmation; pass --force");
    }
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}
