// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer bookmark` subcommands.

use clap::Subcommand;
use coffer_core::{BookmarkPatch, CofferError, DEFAULT_CATEGORY};
use coffer_storage::Coffer;
use tracing::warn;

use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum BookmarkCommand {
    /// Save a new bookmark.
    Add {
        title: String,
        url: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },
    /// List bookmarks, optionally only one category.
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Case-insensitive search over title, url, description and category.
    Search { query: String },
    /// Change fields of a bookmark. Omitted fields are kept.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a bookmark.
    Delete { id: String },
    /// List bookmarks grouped by category.
    Groups,
    /// Distinct category names used by bookmarks.
    Categories,
}

pub fn run(command: BookmarkCommand, coffer: &mut Coffer, out: Output) -> Result<(), CofferError> {
    match command {
        BookmarkCommand::Add {
            title,
            url,
            description,
            category,
        } => {
            warn_unknown_category(coffer, &category);
            let record = coffer
                .bookmarks_mut()
                .add(&title, &url, &description, &category)?;
            if out.json {
                out.bookmarks(&[&record])?;
            }
            out.done(&format!("added bookmark '{}' ({})", record.title, record.id));
        }
        BookmarkCommand::List { category } => {
            let records: Vec<_> = match category {
                Some(name) => coffer.bookmarks().get_by_category(&name),
                None => coffer.bookmarks().get_all().iter().collect(),
            };
            out.bookmarks(&records)?;
        }
        BookmarkCommand::Search { query } => {
            out.bookmarks(&coffer.bookmarks().search(&query))?;
        }
        BookmarkCommand::Update {
            id,
            title,
            url,
            description,
            category,
        } => {
            if let Some(name) = &category {
                warn_unknown_category(coffer, name);
            }
            let patch = BookmarkPatch {
                title,
                url,
                description,
                category,
            };
            if !coffer.bookmarks_mut().update(&id, patch)? {
                return Err(not_found(&id));
            }
            out.done(&format!("updated bookmark {id}"));
        }
        BookmarkCommand::Delete { id } => {
            if !coffer.bookmarks_mut().delete(&id)? {
                return Err(not_found(&id));
            }
            out.done(&format!("deleted bookmark {id}"));
        }
        BookmarkCommand::Groups => {
            out.bookmark_groups(&coffer.bookmarks().get_grouped_by_category())?;
        }
        BookmarkCommand::Categories => {
            out.names(&coffer.bookmarks().get_all_category_names())?;
        }
    }
    Ok(())
}

// Bookmarks may name categories that do not exist; only warn.
fn warn_unknown_category(coffer: &Coffer, name: &str) {
    if coffer.categories().get_by_name(name).is_none() {
        warn!(category = name, "bookmark category does not exist");
    }
}

fn not_found(id: &str) -> CofferError {
    CofferError::Validation(format!("no bookmark with id {id}"))
}
