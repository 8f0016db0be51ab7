//! Key-level operations on a project's entry collection.
//!
//! [`SecretSet`] owns the entries of one project and exposes set/merge/
//! view operations that never require re-encrypting entries the operation
//! does not touch — untouched entries keep their original salt, iv and
//! ciphertext byte for byte.

use tracing::warn;

use crate::crypto::EncryptedRecord;
use crate::error::{PzError, Result};
use crate::project::{EntryValue, SecretEntry, Visibility, PLACEHOLDER_KEY};

/// A decrypted (or degraded) value in a plaintext view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretValue {
    Plain(String),
    /// The entry failed its authentication check during a bulk read.
    /// The raw ciphertext is deliberately not exposed here: presenting it
    /// as if it were the secret would mislead the caller.
    Undecryptable,
}

impl SecretValue {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            SecretValue::Plain(value) => Some(value),
            SecretValue::Undecryptable => None,
        }
    }
}

/// Ordered key→value projection of a project's entries.
///
/// Insertion order is preserved for display; lookups are by key.
#[derive(Debug, Clone, Default)]
pub struct PlaintextView {
    entries: Vec<(String, SecretValue)>,
}

impl PlaintextView {
    pub fn get(&self, key: &str) -> Option<&SecretValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fully decrypted pairs, in display order.
    pub fn plain_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_plain().map(|value| (k.clone(), value.to_string())))
            .collect()
    }

    /// Keys whose entries failed decryption during this read.
    pub fn undecryptable_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| matches!(v, SecretValue::Undecryptable))
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

/// The in-memory entry collection of one project.
#[derive(Debug, Clone, Default)]
pub struct SecretSet {
    entries: Vec<SecretEntry>,
}

impl SecretSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<SecretEntry>) -> Self {
        Self { entries }
    }

    /// The entries in store form, ready for a replace-all write.
    pub fn entries(&self) -> &[SecretEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<SecretEntry> {
        self.entries
    }

    /// Number of user-visible entries (the placeholder does not count).
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.is_placeholder())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the plaintext view of every user-visible entry.
    ///
    /// Public projects copy values verbatim. Private projects decrypt per
    /// entry; a single failing entry degrades to
    /// [`SecretValue::Undecryptable`] (logged, not fatal) so one corrupt
    /// record cannot abort a bulk read. Callers reading a single primary
    /// value must treat `Undecryptable` as a hard
    /// [`PzError::DecryptionFailed`] instead.
    ///
    /// # Errors
    ///
    /// Returns `PzError::MissingPassword` when the project is private and
    /// no password was supplied.
    pub fn plaintext_view(
        &self,
        visibility: Visibility,
        password: Option<&str>,
    ) -> Result<PlaintextView> {
        let password = match visibility {
            Visibility::Public => None,
            Visibility::Private => Some(password.ok_or(PzError::MissingPassword)?),
        };

        let mut view = PlaintextView::default();
        for entry in self.entries.iter().filter(|e| !e.is_placeholder()) {
            let value = match (&entry.value, password) {
                (EntryValue::Plain(value), _) => SecretValue::Plain(value.clone()),
                (EntryValue::Encrypted(record), Some(password)) => {
                    match record.decrypt(password) {
                        Ok(plaintext) => SecretValue::Plain(plaintext),
                        Err(_) => {
                            warn!(key = %entry.key, "entry failed decryption; marking undecryptable");
                            SecretValue::Undecryptable
                        }
                    }
                }
                // Encrypted entry in a public project: the store contract
                // says this never happens, but don't invent plaintext.
                (EntryValue::Encrypted(_), None) => {
                    warn!(key = %entry.key, "encrypted entry in public project; marking undecryptable");
                    SecretValue::Undecryptable
                }
            };
            view.entries.push((entry.key.clone(), value));
        }
        Ok(view)
    }

    /// Set one key to a new value.
    ///
    /// Removes any existing entry with the same key (and the placeholder,
    /// if present), encrypts the value with a fresh salt/iv for private
    /// projects, and appends. Every other entry is left untouched.
    pub fn set(
        &mut self,
        key: &str,
        value: &str,
        visibility: Visibility,
        password: Option<&str>,
    ) -> Result<()> {
        validate_key(key)?;

        let entry = match visibility {
            Visibility::Public => SecretEntry::plain(key, value),
            Visibility::Private => {
                let password = password.ok_or(PzError::MissingPassword)?;
                SecretEntry::encrypted(key, EncryptedRecord::encrypt(value, password)?)
            }
        };

        self.entries
            .retain(|existing| existing.key != key && !existing.is_placeholder());
        self.entries.push(entry);
        Ok(())
    }

    /// Apply [`SecretSet::set`] for every pair, each with its own fresh
    /// salt/iv. On a key collision the incoming value wins.
    pub fn merge(
        &mut self,
        pairs: &[(String, String)],
        visibility: Visibility,
        password: Option<&str>,
    ) -> Result<()> {
        for (key, value) in pairs {
            self.set(key, value, visibility, password)?;
        }
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(PzError::MalformedInput("key cannot be empty".to_string()));
    }
    if key == PLACEHOLDER_KEY {
        return Err(PzError::MalformedInput(format!(
            "\"{}\" is a reserved key",
            PLACEHOLDER_KEY
        )));
    }
    Ok(())
}
