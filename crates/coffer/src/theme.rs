// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer theme` subcommands.

use clap::Subcommand;
use coffer_config::{CofferConfig, ThemeSettings};
use coffer_core::CofferError;

use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    /// Print the selected theme.
    Get,
    /// Select a theme.
    Set { name: String },
}

pub fn run(command: ThemeCommand, config: &CofferConfig, out: Output) -> Result<(), CofferError> {
    let path = config.storage.theme_path();
    match command {
        ThemeCommand::Get => {
            let settings = ThemeSettings::load(&path);
            if out.json {
                out.print_json(&settings)?;
            } else {
                println!("{}", settings.current_theme);
            }
        }
        ThemeCommand::Set { name } => {
            if name.trim().is_empty() {
                return Err(CofferError::Validation(
                    "theme name must not be empty".to_string(),
                ));
            }
            ThemeSettings {
                current_theme: name.clone(),
            }
            .save(&path)?;
            out.done(&format!("theme set to '{name}'"));
        }
    }
    Ok(())
}
