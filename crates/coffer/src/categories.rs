// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer category` subcommands.

use clap::Subcommand;
use coffer_core::{CategoryPatch, CofferError, DEFAULT_CATEGORY, DEFAULT_COLOR};
use coffer_storage::Coffer;

use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Create a category. Names are unique and case-sensitive.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = DEFAULT_COLOR)]
        color: String,
    },
    /// List all categories.
    List,
    /// Change fields of a category. Omitted fields are kept.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category. The default category cannot be deleted.
    Delete {
        id: String,
        /// Move the category's bookmarks to the default category.
        #[arg(long)]
        reassign: bool,
    },
}

pub fn run(command: CategoryCommand, coffer: &mut Coffer, out: Output) -> Result<(), CofferError> {
    match command {
        CategoryCommand::Add {
            name,
            description,
            color,
        } => {
            let record = coffer.categories_mut().add(&name, &description, &color)?;
            if out.json {
                out.categories(std::slice::from_ref(&record))?;
            }
            out.done(&format!("added category '{}' ({})", record.name, record.id));
        }
        CategoryCommand::List => {
            out.categories(coffer.categories().get_all())?;
        }
        CategoryCommand::Update {
            id,
            name,
            description,
            color,
        } => {
            let patch = CategoryPatch {
                name,
                description,
                color,
            };
            if !coffer.categories_mut().update(&id, patch)? {
                return Err(not_found(&id));
            }
            out.done(&format!("updated category {id}"));
        }
        CategoryCommand::Delete { id, reassign } => {
            let Some(moved) = coffer.delete_category(&id, reassign)? else {
                return Err(not_found(&id));
            };
            if reassign {
                out.done(&format!(
                    "deleted category {id}; {moved} bookmark(s) moved to '{DEFAULT_CATEGORY}'"
                ));
            } else {
                out.done(&format!("deleted category {id}"));
            }
        }
    }
    Ok(())
}

fn not_found(id: &str) -> CofferError {
    CofferError::Validation(format!("no category with id {id}"))
}
