//! Data model for secret projects and their entries.
//!
//! A project is a named collection of key/value entries with a single
//! visibility mode: `public` entries are stored in the clear, `private`
//! entries are encrypted client-side before they ever leave the process.
//! Mixed-mode entries within one project never occur.
//!
//! The wire shapes follow the server's JSON: a plaintext entry is
//! `{ "key": ..., "value": ... }`, an encrypted entry stores the base64
//! ciphertext in `value` and carries `salt` and `iv` alongside it.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::EncryptedRecord;
use crate::error::{PzError, Result};

/// Reserved key for the entry created with every new project. The backend
/// requires at least one entry at creation time; this one is excluded from
/// every user-facing listing, export, get and count, and is dropped by any
/// replace-all write.
pub const PLACEHOLDER_KEY: &str = "_init";

/// Value stored under the placeholder key.
pub const PLACEHOLDER_VALUE: &str = "initialized";

/// Visibility mode, fixed per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_private(self) -> bool {
        matches!(self, Visibility::Private)
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// The value of one entry: plaintext or an encrypted record, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Plain(String),
    Encrypted(EncryptedRecord),
}

/// One named entry in a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub key: String,
    pub value: EntryValue,
}

impl SecretEntry {
    pub fn plain(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: EntryValue::Plain(value.into()),
        }
    }

    pub fn encrypted(key: impl Into<String>, record: EncryptedRecord) -> Self {
        Self {
            key: key.into(),
            value: EntryValue::Encrypted(record),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.key == PLACEHOLDER_KEY
    }
}

/// Build the placeholder entry for a freshly created project, encrypting
/// it when the project is private.
pub fn placeholder_entry(visibility: Visibility, password: Option<&str>) -> Result<SecretEntry> {
    match visibility {
        Visibility::Public => Ok(SecretEntry::plain(PLACEHOLDER_KEY, PLACEHOLDER_VALUE)),
        Visibility::Private => {
            let password = password.ok_or(PzError::MissingPassword)?;
            let record = EncryptedRecord::encrypt(PLACEHOLDER_VALUE, password)?;
            Ok(SecretEntry::encrypted(PLACEHOLDER_KEY, record))
        }
    }
}

/// A secret project as returned by the collaborator store.
///
/// Entry order is preserved for display only; lookups are by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretProject {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "projectName")]
    pub name: String,

    pub visibility: Visibility,

    #[serde(rename = "secrets", default)]
    pub entries: Vec<SecretEntry>,

    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// Wire form of an entry. `salt` and `iv` are present exactly when the
// entry is encrypted; `value` then holds the base64 ciphertext.
#[derive(Serialize, Deserialize)]
struct WireEntry {
    key: String,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iv: Option<String>,
}

impl Serialize for SecretEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let wire = match &self.value {
            EntryValue::Plain(value) => WireEntry {
                key: self.key.clone(),
                value: value.clone(),
                salt: None,
                iv: None,
            },
            EntryValue::Encrypted(record) => WireEntry {
                key: self.key.clone(),
                value: record.ciphertext_b64(),
                salt: Some(record.salt_b64()),
                iv: Some(record.iv_b64()),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = WireEntry::deserialize(deserializer)?;
        let value = match (wire.salt, wire.iv) {
            (Some(salt), Some(iv)) => {
                let record = EncryptedRecord::from_base64(&wire.value, &salt, &iv)
                    .map_err(D::Error::custom)?;
                EntryValue::Encrypted(record)
            }
            (None, None) => EntryValue::Plain(wire.value),
            _ => {
                return Err(D::Error::custom(
                    "entry carries salt without iv (or iv without salt)",
                ))
            }
        };
        Ok(SecretEntry {
            key: wire.key,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_entry_wire_shape() {
        let entry = SecretEntry::plain("API_KEY", "sk-123");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["key"], "API_KEY");
        assert_eq!(json["value"], "sk-123");
        assert!(json.get("salt").is_none());
        assert!(json.get("iv").is_none());
    }

    #[test]
    fn test_encrypted_entry_wire_round_trip() {
        let record = EncryptedRecord::encrypt("sk-123", "pw1").unwrap();
        let entry = SecretEntry::encrypted("API_KEY", record);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["key"], "API_KEY");
        assert!(json["salt"].is_string());
        assert!(json["iv"].is_string());

        let restored: SecretEntry = serde_json::from_value(json).unwrap();
        match restored.value {
            EntryValue::Encrypted(record) => {
                assert_eq!(record.decrypt("pw1").unwrap(), "sk-123");
            }
            EntryValue::Plain(_) => panic!("entry lost its encryption on the wire"),
        }
    }

    #[test]
    fn test_entry_with_salt_but_no_iv_rejected() {
        let result: std::result::Result<SecretEntry, _> = serde_json::from_value(serde_json::json!({
            "key": "A",
            "value": "abc",
            "salt": "c2FsdA=="
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_project_deserializes_server_shape() {
        let project: SecretProject = serde_json::from_value(serde_json::json!({
            "_id": "66f1a2b3",
            "projectName": "my-app",
            "visibility": "public",
            "secrets": [
                { "key": "_init", "value": "initialized" },
                { "key": "FOO", "value": "bar" }
            ],
            "updatedAt": "2025-04-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(project.id, "66f1a2b3");
        assert_eq!(project.name, "my-app");
        assert_eq!(project.visibility, Visibility::Public);
        assert_eq!(project.entries.len(), 2);
        assert!(project.entries[0].is_placeholder());
    }

    #[test]
    fn test_project_tolerates_missing_secrets() {
        let project: SecretProject = serde_json::from_value(serde_json::json!({
            "_id": "66f1a2b3",
            "projectName": "empty",
            "visibility": "private"
        }))
        .unwrap();
        assert!(project.entries.is_empty());
        assert!(project.updated_at.is_none());
    }

    #[test]
    fn test_placeholder_entry_private_needs_password() {
        assert!(matches!(
            placeholder_entry(Visibility::Private, None),
            Err(PzError::MissingPassword)
        ));

        let entry = placeholder_entry(Visibility::Private, Some("pw")).unwrap();
        assert!(entry.is_placeholder());
        match entry.value {
            EntryValue::Encrypted(record) => {
                assert_eq!(record.decrypt("pw").unwrap(), PLACEHOLDER_VALUE);
            }
            EntryValue::Plain(_) => panic!("private placeholder must be encrypted"),
        }
    }
}
