// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coffer - a local-first secrets vault for passwords and bookmarks.
//!
//! This is the command-line front end over `coffer-storage`.

mod bookmarks;
mod categories;
mod output;
mod passphrase;
mod passwords;
mod theme;
mod vault;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coffer_config::CofferConfig;
use coffer_core::CofferError;

use crate::bookmarks::BookmarkCommand;
use crate::categories::CategoryCommand;
use crate::output::Output;
use crate::passwords::PasswordCommand;
use crate::theme::ThemeCommand;

/// Coffer - a local-first secrets vault.
#[derive(Parser, Debug)]
#[command(name = "coffer", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep collections in plaintext for this run.
    #[arg(long, global = true)]
    no_encrypt: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    /// Machine-readable JSON output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage stored passwords.
    #[command(subcommand)]
    Password(PasswordCommand),
    /// Manage bookmarks.
    #[command(subcommand)]
    Bookmark(BookmarkCommand),
    /// Manage bookmark categories.
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage the vault access code.
    #[command(subcommand)]
    Passphrase(PassphraseCommand),
    /// Write every collection back as plaintext.
    Decrypt,
    /// Read or select the UI theme.
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Subcommand, Debug)]
enum PassphraseCommand {
    /// Re-encrypt all collections under a new access code.
    Change,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => coffer_config::load_and_validate_path(path),
        None => coffer_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            coffer_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let out = Output::new(cli.json, cli.plain);
    if let Err(e) = run(cli, &config, out) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &CofferConfig, out: Output) -> Result<(), CofferError> {
    let encrypt = config.vault.encrypt && !cli.no_encrypt;
    match cli.command {
        Commands::Password(command) => {
            let mut coffer = vault::open_vault(config, encrypt)?;
            passwords::run(command, &mut coffer, out)
        }
        Commands::Bookmark(command) => {
            let mut coffer = vault::open_vault(config, encrypt)?;
            bookmarks::run(command, &mut coffer, out)
        }
        Commands::Category(command) => {
            let mut coffer = vault::open_vault(config, encrypt)?;
            categories::run(command, &mut coffer, out)
        }
        Commands::Passphrase(PassphraseCommand::Change) => passphrase::run_change(config, out),
        Commands::Decrypt => passphrase::run_decrypt(config, out),
        Commands::Theme(command) => theme::run(command, config, out),
    }
}

/// Initialize the tracing subscriber on stderr so stdout stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coffer={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
