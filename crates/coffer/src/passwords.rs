// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer password` subcommands.

use clap::Subcommand;
use coffer_core::{CofferError, PasswordPatch};
use coffer_storage::Coffer;

use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum PasswordCommand {
    /// Store a new password entry. Prompts for the password if not given.
    Add {
        title: String,
        #[arg(long, default_value = "")]
        source: String,
        #[arg(long, default_value = "")]
        account: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// List all entries, newest first.
    List {
        /// Show passwords instead of masking them.
        #[arg(long)]
        reveal: bool,
    },
    /// Case-insensitive search over title, source, account and description.
    Search {
        query: String,
        #[arg(long)]
        reveal: bool,
    },
    /// Show one entry with its password.
    Show { id: String },
    /// Change fields of an entry. Omitted fields are kept.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete an entry.
    Delete { id: String },
}

pub fn run(command: PasswordCommand, coffer: &mut Coffer, out: Output) -> Result<(), CofferError> {
    match command {
        PasswordCommand::Add {
            title,
            source,
            account,
            description,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ").map_err(|e| {
                    CofferError::Validation(format!("failed to read password: {e}"))
                })?,
            };
            let record =
                coffer
                    .passwords_mut()
                    .add(&title, &source, &description, &account, &password)?;
            if out.json {
                out.passwords(&[&record], false)?;
            }
            out.done(&format!("added password '{}' ({})", record.title, record.id));
        }
        PasswordCommand::List { reveal } => {
            let all: Vec<_> = coffer.passwords().get_all().iter().collect();
            out.passwords(&all, reveal)?;
        }
        PasswordCommand::Search { query, reveal } => {
            out.passwords(&coffer.passwords().search(&query), reveal)?;
        }
        PasswordCommand::Show { id } => {
            let record = coffer
                .passwords()
                .get_by_id(&id)
                .ok_or_else(|| not_found(&id))?;
            out.password_detail(record)?;
        }
        PasswordCommand::Update {
            id,
            title,
            source,
            account,
            description,
            password,
        } => {
            let patch = PasswordPatch {
                title,
                source,
                description,
                account,
                password,
            };
            if !coffer.passwords_mut().update(&id, patch)? {
                return Err(not_found(&id));
            }
            out.done(&format!("updated password {id}"));
        }
        PasswordCommand::Delete { id } => {
            if !coffer.passwords_mut().delete(&id)? {
                return Err(not_found(&id));
            }
            out.done(&format!("deleted password {id}"));
        }
    }
    Ok(())
}

fn not_found(id: &str) -> CofferError {
    CofferError::Validation(format!("no password entry with id {id}"))
}
