//! The `pz config` command: show or mutate configuration.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::config::{read_config, write_config};

pub fn run(config_path: &Path, set: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    match set {
        Some(pair) => {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("--set expects key=value"))?;

            let mut config = read_config(config_path)?;
            config.set_value(key, value)?;
            write_config(config_path, &config)?;

            if !quiet {
                println!("{} Set {} = {}", "✓".green(), key, value);
            }
        }
        None => {
            let config = read_config(config_path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
