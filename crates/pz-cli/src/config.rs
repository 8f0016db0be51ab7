//! CLI configuration: API endpoint and stored token.
//!
//! Read-or-default on start, explicit save on mutation. The config is
//! passed into the API client rather than read as ambient global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://backend.pastezen.com";

#[derive(Debug, Serialize, Deserialize)]
pub struct PzConfig {
    pub api: ApiSection,
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSection {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct AuthSection {
    pub token: Option<String>,
}

impl Default for PzConfig {
    fn default() -> Self {
        Self {
            api: ApiSection {
                url: DEFAULT_API_URL.to_string(),
            },
            auth: AuthSection::default(),
        }
    }
}

impl PzConfig {
    /// Set one `key=value` pair by dotted name. Used by `pz config --set`.
    pub fn set_value(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "api.url" => self.api.url = value.to_string(),
            "auth.token" => self.auth.token = Some(value.to_string()),
            other => anyhow::bail!("Unknown config key: {} (use api.url or auth.token)", other),
        }
        Ok(())
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Read the config, falling back to defaults when the file is absent.
pub fn read_config(path: &Path) -> anyhow::Result<PzConfig> {
    if !path.exists() {
        return Ok(PzConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &PzConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("pastezen"));
        }
    }
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home).join(".config").join("pastezen"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = read_config(&dir.path().join("config.toml")).expect("read");
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = PzConfig::default();
        config.set_value("auth.token", "tok_abc123").expect("set");
        config.set_value("api.url", "http://localhost:4000").expect("set");
        write_config(&path, &config).expect("write");

        let restored = read_config(&path).expect("read");
        assert_eq!(restored.api.url, "http://localhost:4000");
        assert_eq!(restored.auth.token.as_deref(), Some("tok_abc123"));
    }

    #[test]
    fn test_parse_config_without_auth_section() {
        let config: PzConfig = toml::from_str(
            r#"
            [api]
            url = "https://backend.pastezen.com"
        "#,
        )
        .expect("parse config");
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let mut config = PzConfig::default();
        assert!(config.set_value("colors", "on").is_err());
    }
}
