//! Authentication commands: token storage and status.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::config::{read_config, write_config, PzConfig};
use crate::helpers::mask_token;
use crate::ui::prompt::confirm_destructive;

/// Store an API token in the config file.
pub fn set_token(config_path: &Path, token: &str, quiet: bool) -> anyhow::Result<()> {
    if token.len() < 10 {
        anyhow::bail!("Invalid token format");
    }

    let mut config = read_config(config_path)?;
    config.auth.token = Some(token.to_string());
    write_config(config_path, &config)?;

    if !quiet {
        println!("{} API token saved", "✓".green());
        println!("Stored in {}", config_path.display());
    }
    Ok(())
}

/// Clear the stored token.
pub fn logout(config_path: &Path, force: bool, quiet: bool) -> anyhow::Result<()> {
    if !confirm_destructive("Log out and forget the stored token?", force)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    let mut config = read_config(config_path)?;
    config.auth.token = None;
    write_config(config_path, &config)?;

    if !quiet {
        println!("{} Logged out", "✓".green());
    }
    Ok(())
}

/// Show authentication status with the token masked.
pub fn status(config: &PzConfig) -> anyhow::Result<()> {
    match &config.auth.token {
        Some(token) => {
            println!("{} Authenticated", "✓".green());
            println!("Token: {}", mask_token(token));
        }
        None => {
            println!("{} Not authenticated", "✗".red());
            println!("Run `pz auth token <TOKEN>` to authenticate");
        }
    }
    println!("API URL: {}", config.api.url);
    Ok(())
}
