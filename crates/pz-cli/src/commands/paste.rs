//! Paste commands: push files up, pull them back down, list, view,
//! delete.
//!
//! Paste contents travel base64-encoded on upload and come back as plain
//! text. Protected pastes use the same optimistic fetch-then-unlock flow
//! as secret projects.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;

use pz_core::protocol::fetch_protected;

use crate::api::{ApiClient, NewPaste, NewPasteFile, Paste};
use crate::helpers::{language_from_filename, parse_expiration};
use crate::ui::prompt::{confirm_destructive, new_password, resolve_password};
use crate::ui::Spinner;

pub struct PushOptions<'a> {
    pub title: Option<&'a str>,
    pub private: bool,
    pub protect: bool,
    pub expire: Option<&'a str>,
}

pub fn push(
    client: &ApiClient,
    files: &[PathBuf],
    options: &PushOptions,
    quiet: bool,
) -> anyhow::Result<()> {
    if files.is_empty() {
        anyhow::bail!("No files given. Usage: pz push <FILE>...");
    }

    // Parse everything that can fail locally before touching the network.
    let expires_at = options.expire.map(parse_expiration).transpose()?;

    let mut upload = Vec::with_capacity(files.len());
    for path in files {
        let content = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("Not a file: {}", path.display()))?;
        let language = language_from_filename(&name).to_string();
        upload.push(NewPasteFile {
            name,
            content: BASE64.encode(&content),
            language,
        });
    }

    let password = if options.protect {
        Some(new_password("Enter paste password")?)
    } else {
        None
    };

    let title = options
        .title
        .map(str::to_string)
        .unwrap_or_else(|| upload[0].name.clone());

    let spinner = Spinner::start("Uploading paste...", quiet);
    let body = NewPaste {
        title,
        files: upload,
        visibility: if options.private { "private" } else { "public" },
        is_password_protected: password.is_some().then_some(true),
        password,
        expires_at,
    };
    let paste = match client.create_paste(&body) {
        Ok(paste) => paste,
        Err(err) => {
            spinner.fail("Failed to upload paste");
            return Err(err.into());
        }
    };
    spinner.succeed("Paste uploaded");

    if !quiet {
        println!("ID: {}", paste.id.cyan());
    }
    Ok(())
}

pub fn pull(
    client: &ApiClient,
    id: &str,
    password_flag: Option<&str>,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let spinner = Spinner::start("Fetching paste...", quiet);
    let paste = match fetch_paste(client, id, password_flag, &spinner) {
        Ok(paste) => paste,
        Err(err) => {
            spinner.fail("Failed to fetch paste");
            return Err(err);
        }
    };
    spinner.succeed(&format!("Fetched {} files", paste.files.len()));

    let dir = output.unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", dir.display(), e))?;
    for file in &paste.files {
        // Never let a server-supplied name escape the output directory.
        let name = Path::new(&file.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name in paste: {}", file.name))?;
        let path = dir.join(&name);
        std::fs::write(&path, &file.content)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
        if !quiet {
            println!("{} {}", "✓".green(), path.display());
        }
    }
    Ok(())
}

pub fn list(client: &ApiClient, limit: usize, json: bool, quiet: bool) -> anyhow::Result<()> {
    let spinner = Spinner::start("Fetching pastes...", quiet || json);
    let pastes = match client.list_pastes() {
        Ok(pastes) => pastes,
        Err(err) => {
            spinner.fail("Failed to list pastes");
            return Err(err.into());
        }
    };
    spinner.succeed(&format!("Found {} pastes", pastes.len()));

    if json {
        let page: Vec<_> = pastes.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if pastes.is_empty() {
        println!("No pastes found. Upload one with `pz push <FILE>`");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "TITLE", "VISIBILITY", "FILES", "CREATED"]);
    for paste in pastes.iter().take(limit) {
        let created = paste
            .created_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            paste.id.clone(),
            paste.title.clone().unwrap_or_default(),
            paste.visibility.clone().unwrap_or_default(),
            paste.files.len().to_string(),
            created,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn view(
    client: &ApiClient,
    id: &str,
    password_flag: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let spinner = Spinner::start("Fetching paste...", quiet);
    let paste = match fetch_paste(client, id, password_flag, &spinner) {
        Ok(paste) => paste,
        Err(err) => {
            spinner.fail("Failed to fetch paste");
            return Err(err);
        }
    };
    spinner.clear();

    for file in &paste.files {
        println!("{}", format!("--- {} ---", file.name).cyan());
        println!("{}", file.content);
    }
    Ok(())
}

pub fn delete(client: &ApiClient, id: &str, force: bool, quiet: bool) -> anyhow::Result<()> {
    if !confirm_destructive(&format!("Delete paste {}?", id), force)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    let spinner = Spinner::start("Deleting...", quiet);
    match client.delete_paste(id) {
        Ok(()) => {
            spinner.succeed("Paste deleted");
            Ok(())
        }
        Err(err) => {
            spinner.fail("Failed to delete");
            Err(err.into())
        }
    }
}

fn fetch_paste(
    client: &ApiClient,
    id: &str,
    password_flag: Option<&str>,
    spinner: &Spinner,
) -> anyhow::Result<Paste> {
    let resource = client.paste_resource(id);
    let access = fetch_protected(&resource, || {
        spinner.suspend(|| resolve_password(password_flag, "Enter password"))
    })?;
    let (paste, _password) = access.into_parts();
    Ok(paste)
}
