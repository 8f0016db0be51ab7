//! pz - Pastezen command-line client
//!
//! Pastes and encrypted secret projects from the terminal. Secrets in
//! private projects are encrypted client-side; the backend only ever
//! sees ciphertext.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pz_core::VERSION;

mod api;
mod commands;
mod config;
mod helpers;
mod ui;

use api::ApiClient;
use commands::paste::PushOptions;

/// pz - Pastezen command-line client
#[derive(Parser)]
#[command(name = "pz")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "PZ_CONFIG")]
    config: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Upload files as a paste
    Push {
        /// Files to upload
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Paste title (defaults to the first file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Make the paste private
        #[arg(long)]
        private: bool,

        /// Protect the paste with a password (prompted)
        #[arg(long = "password")]
        protect: bool,

        /// Expiration window (e.g., "24h", "7d", "2w", "1m")
        #[arg(short, long, value_name = "WINDOW")]
        expire: Option<String>,
    },

    /// Download a paste's files
    Pull {
        /// Paste ID
        #[arg(value_name = "ID")]
        id: String,

        /// Password for a protected paste
        #[arg(short, long)]
        password: Option<String>,

        /// Output directory (defaults to the current directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// List your pastes
    List {
        /// Limit number of results
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a paste's contents
    View {
        /// Paste ID
        #[arg(value_name = "ID")]
        id: String,

        /// Password for a protected paste
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Delete a paste
    Delete {
        /// Paste ID
        #[arg(value_name = "ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Manage secret projects
    Secrets {
        #[command(subcommand)]
        command: SecretsCommands,
    },

    /// Show or change configuration
    Config {
        /// Set a value (e.g., --set api.url=https://example.com)
        #[arg(long, value_name = "KEY=VALUE")]
        set: Option<String>,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Store an API token
    Token {
        /// Token obtained from the Pastezen dashboard
        #[arg(value_name = "TOKEN")]
        token: String,
    },

    /// Remove the stored token
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show authentication status
    Status,
}

#[derive(Subcommand)]
enum SecretsCommands {
    /// List your secret projects
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new secret project
    Create {
        /// Project name
        #[arg(value_name = "NAME")]
        name: String,

        /// Store values in plaintext instead of encrypting
        #[arg(long)]
        public: bool,
    },

    /// Print all keys and values of a project
    View {
        /// Project ID
        #[arg(value_name = "ID")]
        id: String,

        /// Password for a private project
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Print a single value
    Get {
        /// Project ID
        #[arg(value_name = "ID")]
        id: String,

        /// Key to read
        #[arg(value_name = "KEY")]
        key: String,

        /// Password for a private project
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Set a key to a value
    Set {
        /// Project ID
        #[arg(value_name = "ID")]
        id: String,

        /// KEY=value pair
        #[arg(value_name = "KEY=VALUE")]
        key_value: String,

        /// Password for a private project
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Delete a secret project
    Delete {
        /// Project ID
        #[arg(value_name = "ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Write a project's secrets as a .env file
    Export {
        /// Project ID
        #[arg(value_name = "ID")]
        id: String,

        /// Password for a private project
        #[arg(short, long)]
        password: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Merge a .env file into a project
    Import {
        /// Project ID
        #[arg(value_name = "ID")]
        id: String,

        /// Path to the .env file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Password for a private project
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let loaded = config::read_config(&config_path)?;

    match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Token { token } => {
                commands::auth::set_token(&config_path, &token, cli.quiet)
            }
            AuthCommands::Logout { force } => {
                commands::auth::logout(&config_path, force, cli.quiet)
            }
            AuthCommands::Status => commands::auth::status(&loaded),
        },

        Commands::Push {
            files,
            title,
            private,
            protect,
            expire,
        } => {
            let client = ApiClient::new(&loaded)?;
            let options = PushOptions {
                title: title.as_deref(),
                private,
                protect,
                expire: expire.as_deref(),
            };
            commands::paste::push(&client, &files, &options, cli.quiet)
        }
        Commands::Pull {
            id,
            password,
            output,
        } => {
            let client = ApiClient::new(&loaded)?;
            commands::paste::pull(
                &client,
                &id,
                password.as_deref(),
                output.as_deref(),
                cli.quiet,
            )
        }
        Commands::List { limit, json } => {
            let client = ApiClient::new(&loaded)?;
            commands::paste::list(&client, limit, json, cli.quiet)
        }
        Commands::View { id, password } => {
            let client = ApiClient::new(&loaded)?;
            commands::paste::view(&client, &id, password.as_deref(), cli.quiet)
        }
        Commands::Delete { id, force } => {
            let client = ApiClient::new(&loaded)?;
            commands::paste::delete(&client, &id, force, cli.quiet)
        }

        Commands::Secrets { command } => {
            let client = ApiClient::new(&loaded)?;
            match command {
                SecretsCommands::List { json } => {
                    commands::secrets::list(&client, json, cli.quiet)
                }
                SecretsCommands::Create { name, public } => {
                    commands::secrets::create(&client, &name, public, cli.quiet)
                }
                SecretsCommands::View { id, password } => {
                    commands::secrets::view(&client, &id, password.as_deref(), cli.quiet)
                }
                SecretsCommands::Get { id, key, password } => {
                    commands::secrets::get(&client, &id, &key, password.as_deref())
                }
                SecretsCommands::Set {
                    id,
                    key_value,
                    password,
                } => commands::secrets::set(
                    &client,
                    &id,
                    &key_value,
                    password.as_deref(),
                    cli.quiet,
                ),
                SecretsCommands::Delete { id, force } => {
                    commands::secrets::delete(&client, &id, force, cli.quiet)
                }
                SecretsCommands::Export {
                    id,
                    password,
                    output,
                } => commands::secrets::export(
                    &client,
                    &id,
                    password.as_deref(),
                    output.as_deref(),
                    cli.quiet,
                ),
                SecretsCommands::Import { id, file, password } => {
                    commands::secrets::import(
                        &client,
                        &id,
                        &file,
                        password.as_deref(),
                        cli.quiet,
                    )
                }
            }
        }

        Commands::Config { set } => commands::config::run(&config_path, set.as_deref(), cli.quiet),
    }
}
