//! Secrets commands: project lifecycle, key-level reads and writes, and
//! `.env` import/export.
//!
//! Every read of a possibly-protected project goes through the core's
//! `fetch_protected` protocol; the password is asked for at most once
//! per invocation, and only when the server actually denies the open
//! fetch.

use std::path::Path;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;

use pz_core::envfile::{parse_env, parse_key_value, to_env};
use pz_core::project::{placeholder_entry, SecretProject, Visibility};
use pz_core::protocol::fetch_protected;
use pz_core::{PzError, SecretSet, SecretValue};

use crate::api::{ApiClient, NewSecretProject};
use crate::ui::prompt::{new_password, resolve_password, confirm_destructive};
use crate::ui::Spinner;

/// Fetch a project, unlocking it if the server denies the open fetch.
/// Returns the project together with the password used, if any.
fn fetch_project(
    client: &ApiClient,
    id: &str,
    password_flag: Option<&str>,
    spinner: &Spinner,
) -> anyhow::Result<(SecretProject, Option<String>)> {
    let resource = client.secret_resource(id);
    let access = fetch_protected(&resource, || {
        spinner.suspend(|| resolve_password(password_flag, "Enter password"))
    })?;
    Ok(access.into_parts())
}

/// A password for decrypting/encrypting the project's entries. Normally
/// this is the one the unlock used; if a private project was somehow
/// served open, resolve one now.
fn project_password(
    project: &SecretProject,
    unlocked_with: Option<String>,
    password_flag: Option<&str>,
    spinner: &Spinner,
) -> anyhow::Result<Option<String>> {
    if !project.visibility.is_private() {
        return Ok(None);
    }
    match unlocked_with {
        Some(password) => Ok(Some(password)),
        None => Ok(Some(spinner.suspend(|| {
            resolve_password(password_flag, "Enter password")
        })?)),
    }
}

pub fn list(client: &ApiClient, json: bool, quiet: bool) -> anyhow::Result<()> {
    let spinner = Spinner::start("Fetching secret projects...", quiet || json);
    let projects = match client.list_secrets() {
        Ok(projects) => projects,
        Err(err) => {
            spinner.fail("Failed to list secret projects");
            return Err(err.into());
        }
    };
    spinner.succeed(&format!("Found {} secret projects", projects.len()));

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No secret projects found. Create one with `pz secrets create <name>`");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "NAME", "VISIBILITY", "UPDATED"]);
    for project in &projects {
        let updated = project
            .updated_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            project.id.clone(),
            project.name.clone(),
            project.visibility.to_string(),
            updated,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn create(client: &ApiClient, name: &str, public: bool, quiet: bool) -> anyhow::Result<()> {
    let visibility = if public {
        Visibility::Public
    } else {
        Visibility::Private
    };

    let password = if public {
        None
    } else {
        Some(new_password("Enter encryption password")?)
    };

    let spinner = Spinner::start("Creating secret project...", quiet);
    let entries = vec![placeholder_entry(visibility, password.as_deref())?];
    let body = NewSecretProject {
        name,
        visibility,
        password: password.as_deref(),
        secrets: &entries,
    };
    let project = match client.create_secret(&body) {
        Ok(project) => project,
        Err(err) => {
            spinner.fail("Failed to create secret project");
            return Err(err.into());
        }
    };
    spinner.succeed("Secret project created");

    if !quiet {
        println!("ID: {}", project.id.cyan());
        println!("Name: {}", project.name);
        println!("Visibility: {}", project.visibility);
    }
    Ok(())
}

pub fn view(
    client: &ApiClient,
    id: &str,
    password_flag: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let spinner = Spinner::start("Fetching secrets...", quiet);
    let result = fetch_project(client, id, password_flag, &spinner).and_then(|(project, pw)| {
        let password = project_password(&project, pw, password_flag, &spinner)?;
        let set = SecretSet::from_entries(project.entries.clone());
        let view = set.plaintext_view(project.visibility, password.as_deref())?;
        Ok((project, view))
    });
    let (project, view) = match result {
        Ok(parts) => parts,
        Err(err) => {
            spinner.fail("Failed to fetch secrets");
            return Err(err);
        }
    };
    spinner.succeed(&project.name);

    if view.is_empty() {
        println!("No secrets stored yet. Add with `pz secrets set {} KEY=value`", id);
        return Ok(());
    }
    for (key, value) in view.iter() {
        match value {
            SecretValue::Plain(value) => println!("{}={}", key.cyan(), value),
            SecretValue::Undecryptable => {
                println!("{}={}", key.cyan(), "<undecryptable>".red())
            }
        }
    }
    Ok(())
}

pub fn get(
    client: &ApiClient,
    id: &str,
    key: &str,
    password_flag: Option<&str>,
) -> anyhow::Result<()> {
    // Spinner writes to stderr; stdout carries only the value, so the
    // command stays pipeable.
    let spinner = Spinner::start("Fetching secret...", false);
    let result = fetch_project(client, id, password_flag, &spinner).and_then(|(project, pw)| {
        let password = project_password(&project, pw, password_flag, &spinner)?;
        let set = SecretSet::from_entries(project.entries);
        let view = set.plaintext_view(project.visibility, password.as_deref())?;
        Ok(view)
    });
    let view = match result {
        Ok(view) => view,
        Err(err) => {
            spinner.fail("Failed to get secret");
            return Err(err);
        }
    };
    spinner.clear();

    match view.get(key) {
        Some(SecretValue::Plain(value)) => {
            println!("{}", value);
            Ok(())
        }
        // The primary requested value is never degraded: surface the
        // decryption failure instead of anything that looks like data.
        Some(SecretValue::Undecryptable) => Err(PzError::DecryptionFailed.into()),
        None => Err(PzError::NotFound(format!("Key '{}' not found", key)).into()),
    }
}

pub fn set(
    client: &ApiClient,
    id: &str,
    key_value: &str,
    password_flag: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    // Reject malformed input before any network call.
    let (key, value) = parse_key_value(key_value)?;

    let spinner = Spinner::start("Updating secret...", quiet);
    let result = fetch_project(client, id, password_flag, &spinner).and_then(|(project, pw)| {
        let password = project_password(&project, pw, password_flag, &spinner)?;
        let mut set = SecretSet::from_entries(project.entries);
        set.set(&key, &value, project.visibility, password.as_deref())?;
        client.replace_entries(id, set.entries())?;
        Ok(())
    });
    match result {
        Ok(()) => {
            spinner.succeed(&format!("Set {}", key));
            Ok(())
        }
        Err(err) => {
            spinner.fail("Failed to set secret");
            Err(err)
        }
    }
}

pub fn delete(client: &ApiClient, id: &str, force: bool, quiet: bool) -> anyhow::Result<()> {
    if !confirm_destructive(&format!("Delete secret project {}?", id), force)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    let spinner = Spinner::start("Deleting...", quiet);
    match client.delete_secret(id) {
        Ok(()) => {
            spinner.succeed("Secret project deleted");
            Ok(())
        }
        Err(err) => {
            spinner.fail("Failed to delete");
            Err(err.into())
        }
    }
}

pub fn export(
    client: &ApiClient,
    id: &str,
    password_flag: Option<&str>,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let spinner = Spinner::start("Exporting secrets...", quiet);
    let result = fetch_project(client, id, password_flag, &spinner).and_then(|(project, pw)| {
        let password = project_password(&project, pw, password_flag, &spinner)?;
        let set = SecretSet::from_entries(project.entries);
        let view = set.plaintext_view(project.visibility, password.as_deref())?;
        Ok(view)
    });
    let view = match result {
        Ok(view) => view,
        Err(err) => {
            spinner.fail("Failed to export");
            return Err(err);
        }
    };
    spinner.clear();

    let undecryptable = view.undecryptable_keys();
    if !undecryptable.is_empty() {
        eprintln!(
            "{} Skipping undecryptable keys: {}",
            "✗".red(),
            undecryptable.join(", ")
        );
    }

    let content = to_env(&view.plain_pairs());
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", content))
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
            if !quiet {
                println!("{} Exported to {}", "✓".green(), path.display());
            }
        }
        None => {
            if content.is_empty() {
                if !quiet {
                    println!("(no secrets)");
                }
            } else {
                println!("{}", content);
            }
        }
    }
    Ok(())
}

pub fn import(
    client: &ApiClient,
    id: &str,
    file: &Path,
    password_flag: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    // Parse the whole file up front; a malformed line aborts before any
    // network call.
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    let pairs = parse_env(&content)?;

    let spinner = Spinner::start("Importing secrets...", quiet);
    let result = fetch_project(client, id, password_flag, &spinner).and_then(|(project, pw)| {
        let password = project_password(&project, pw, password_flag, &spinner)?;
        let mut set = SecretSet::from_entries(project.entries);
        set.merge(&pairs, project.visibility, password.as_deref())?;
        client.replace_entries(id, set.entries())?;
        Ok(())
    });
    match result {
        Ok(()) => {
            spinner.succeed(&format!("Imported {} secrets", pairs.len()));
            Ok(())
        }
        Err(err) => {
            spinner.fail("Failed to import");
            Err(err)
        }
    }
}
