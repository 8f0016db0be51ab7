//! HTTP client for the Pastezen backend.
//!
//! The collaborator store behind the core's `ProtectedResource` seam:
//! bearer-token auth, JSON bodies, and a small status-code mapping onto
//! the core error taxonomy (403 is the access-denied signal the protocol
//! recovers from; everything else propagates).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pz_core::project::{SecretEntry, SecretProject, Visibility};
use pz_core::protocol::ProtectedResource;
use pz_core::{PzError, Result};

use crate::config::PzConfig;

pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Build a client from the loaded configuration.
    ///
    /// Fails fast when no token is stored; every endpoint requires auth.
    pub fn new(config: &PzConfig) -> anyhow::Result<Self> {
        let token = config.auth.token.clone().ok_or_else(|| {
            anyhow::anyhow!("Not authenticated. Run `pz auth token <TOKEN>` first.")
        })?;
        Ok(Self {
            http: reqwest::blocking::Client::new(),
            base_url: config.api.url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response> {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .map_err(transport_error)
            .and_then(check_status)
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::blocking::Response> {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(transport_error)
            .and_then(check_status)
    }

    fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::blocking::Response> {
        self.http
            .put(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(transport_error)
            .and_then(check_status)
    }

    fn delete(&self, path: &str) -> Result<reqwest::blocking::Response> {
        self.http
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .map_err(transport_error)
            .and_then(check_status)
    }

    // --- Secrets ---

    pub fn list_secrets(&self) -> Result<Vec<SecretProject>> {
        parse_json(self.get("/api/secrets")?)
    }

    pub fn create_secret(&self, body: &NewSecretProject) -> Result<SecretProject> {
        parse_json(self.post("/api/secrets", body)?)
    }

    pub fn get_secret(&self, id: &str) -> Result<SecretProject> {
        parse_json(self.get(&format!("/api/secrets/{}", id))?)
    }

    pub fn unlock_secret(&self, id: &str, password: &str) -> Result<SecretProject> {
        parse_json(self.post(
            &format!("/api/secrets/{}/unlock", id),
            &UnlockRequest { password },
        )?)
    }

    /// Replace a project's full entry collection in one write.
    pub fn replace_entries(&self, id: &str, entries: &[SecretEntry]) -> Result<()> {
        self.put(
            &format!("/api/secrets/{}", id),
            &ReplaceEntries { secrets: entries },
        )?;
        Ok(())
    }

    pub fn delete_secret(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/secrets/{}", id))?;
        Ok(())
    }

    // --- Pastes ---

    pub fn list_pastes(&self) -> Result<Vec<Paste>> {
        parse_json(self.get("/api/pastes")?)
    }

    pub fn create_paste(&self, body: &NewPaste) -> Result<Paste> {
        parse_json(self.post("/api/pastes", body)?)
    }

    pub fn get_paste(&self, id: &str) -> Result<Paste> {
        parse_json(self.get(&format!("/api/pastes/{}", id))?)
    }

    pub fn unlock_paste(&self, id: &str, password: &str) -> Result<Paste> {
        parse_json(self.post(
            &format!("/api/pastes/{}/unlock", id),
            &UnlockRequest { password },
        )?)
    }

    pub fn delete_paste(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/pastes/{}", id))?;
        Ok(())
    }

    /// The secret project with the given id, as a protected resource.
    pub fn secret_resource<'a>(&'a self, id: &'a str) -> SecretResource<'a> {
        SecretResource { client: self, id }
    }

    /// The paste with the given id, as a protected resource.
    pub fn paste_resource<'a>(&'a self, id: &'a str) -> PasteResource<'a> {
        PasteResource { client: self, id }
    }
}

pub struct SecretResource<'a> {
    client: &'a ApiClient,
    id: &'a str,
}

impl ProtectedResource for SecretResource<'_> {
    type Payload = SecretProject;

    fn fetch(&self) -> Result<SecretProject> {
        self.client.get_secret(self.id)
    }

    fn unlock(&self, password: &str) -> Result<SecretProject> {
        self.client.unlock_secret(self.id, password)
    }
}

pub struct PasteResource<'a> {
    client: &'a ApiClient,
    id: &'a str,
}

impl ProtectedResource for PasteResource<'_> {
    type Payload = Paste;

    fn fetch(&self) -> Result<Paste> {
        self.client.get_paste(self.id)
    }

    fn unlock(&self, password: &str) -> Result<Paste> {
        self.client.unlock_paste(self.id, password)
    }
}

// --- Wire types ---

#[derive(Serialize)]
struct UnlockRequest<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct ReplaceEntries<'a> {
    secrets: &'a [SecretEntry],
}

/// Body for `POST /api/secrets`. The backend requires at least one entry,
/// so callers always include the placeholder.
#[derive(Serialize)]
pub struct NewSecretProject<'a> {
    #[serde(rename = "projectName")]
    pub name: &'a str,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    pub secrets: &'a [SecretEntry],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paste {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub files: Vec<PasteFile>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteFile {
    pub name: String,
    /// Served as plain text by the API (uploads are base64).
    pub content: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Serialize)]
pub struct NewPaste {
    pub title: String,
    pub files: Vec<NewPasteFile>,
    pub visibility: &'static str,
    #[serde(rename = "isPasswordProtected", skip_serializing_if = "Option::is_none")]
    pub is_password_protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct NewPasteFile {
    pub name: String,
    /// Base64-encoded on upload.
    pub content: String,
    pub language: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn transport_error(err: reqwest::Error) -> PzError {
    PzError::Store(format!("Request failed: {}", err))
}

fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
    response
        .json()
        .map_err(|e| PzError::Store(format!("Invalid response body: {}", e)))
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    let status = response.status().as_u16();
    if (200..300).contains(&status) {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("server returned status {}", status));
    Err(map_status(status, message))
}

fn map_status(status: u16, message: String) -> PzError {
    match status {
        403 => PzError::AccessDenied,
        404 => PzError::NotFound(message),
        _ => PzError::Store(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(403, "forbidden".to_string()),
            PzError::AccessDenied
        ));
        assert!(matches!(
            map_status(404, "gone".to_string()),
            PzError::NotFound(_)
        ));
        assert!(matches!(
            map_status(500, "boom".to_string()),
            PzError::Store(_)
        ));
    }

    #[test]
    fn test_new_secret_project_wire_shape() {
        let entries = vec![SecretEntry::plain("_init", "initialized")];
        let body = NewSecretProject {
            name: "my-app",
            visibility: Visibility::Public,
            password: None,
            secrets: &entries,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["projectName"], "my-app");
        assert_eq!(json["visibility"], "public");
        assert!(json.get("password").is_none());
        assert_eq!(json["secrets"][0]["key"], "_init");
    }

    #[test]
    fn test_client_requires_token() {
        let config = PzConfig::default();
        assert!(ApiClient::new(&config).is_err());
    }
}
