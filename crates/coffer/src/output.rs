// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal and JSON rendering of records.

use std::io::IsTerminal;

use coffer_core::{BookmarkRecord, CategoryRecord, CofferError, PasswordRecord};
use coffer_vault::mask_secret;
use serde::Serialize;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub color: bool,
}

impl Output {
    /// Colors are used only on a terminal and never with `--plain`.
    pub fn new(json: bool, plain: bool) -> Self {
        Self {
            json,
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), CofferError> {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|e| CofferError::storage("failed to render JSON output", e))?;
        println!("{rendered}");
        Ok(())
    }

    /// One-line confirmation of a completed action.
    pub fn done(&self, message: &str) {
        if self.json {
            return;
        }
        if self.color {
            use colored::Colorize;
            println!("{} {message}", "✓".green());
        } else {
            println!("[OK] {message}");
        }
    }

    pub fn heading(&self, text: &str) {
        if self.color {
            use colored::Colorize;
            println!("{}", text.bold());
        } else {
            println!("{text}");
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            use colored::Colorize;
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn passwords(&self, records: &[&PasswordRecord], reveal: bool) -> Result<(), CofferError> {
        if self.json {
            let views: Vec<PasswordView<'_>> =
                records.iter().map(|r| PasswordView::new(r, reveal)).collect();
            return self.print_json(&views);
        }
        if records.is_empty() {
            println!("no passwords found");
            return Ok(());
        }
        for record in records {
            let secret = if reveal {
                record.password.clone()
            } else {
                mask_secret(&record.password)
            };
            println!(
                "{}  {}  {}  {}  {}",
                self.dim(&record.id),
                record.title,
                record.source,
                record.account,
                secret
            );
        }
        Ok(())
    }

    /// Full detail of one password entry, password included.
    pub fn password_detail(&self, record: &PasswordRecord) -> Result<(), CofferError> {
        if self.json {
            return self.print_json(&PasswordView::new(record, true));
        }
        self.heading(&record.title);
        println!("  id:          {}", record.id);
        println!("  source:      {}", record.source);
        println!("  account:     {}", record.account);
        println!("  password:    {}", record.password);
        println!("  description: {}", record.description);
        println!("  created:     {}", record.created_time);
        println!("  updated:     {}", record.updated_time);
        Ok(())
    }

    pub fn bookmarks(&self, records: &[&BookmarkRecord]) -> Result<(), CofferError> {
        if self.json {
            return self.print_json(records);
        }
        if records.is_empty() {
            println!("no bookmarks found");
            return Ok(());
        }
        for record in records {
            println!(
                "{}  {}  {}  [{}]",
                self.dim(&record.id),
                record.title,
                record.url,
                record.category
            );
        }
        Ok(())
    }

    pub fn bookmark_groups(
        &self,
        groups: &[(String, Vec<&BookmarkRecord>)],
    ) -> Result<(), CofferError> {
        if self.json {
            let views: Vec<BookmarkGroup<'_>> = groups
                .iter()
                .map(|(category, bookmarks)| BookmarkGroup {
                    category,
                    bookmarks,
                })
                .collect();
            return self.print_json(&views);
        }
        for (name, members) in groups {
            self.heading(&format!("{name} ({})", members.len()));
            for record in members {
                println!("  {}  {}  {}", self.dim(&record.id), record.title, record.url);
            }
        }
        Ok(())
    }

    pub fn categories(&self, records: &[CategoryRecord]) -> Result<(), CofferError> {
        if self.json {
            return self.print_json(records);
        }
        for record in records {
            println!(
                "{}  {}  {}  {}",
                self.dim(&record.id),
                record.name,
                record.color,
                record.description
            );
        }
        Ok(())
    }

    pub fn names(&self, names: &[String]) -> Result<(), CofferError> {
        if self.json {
            return self.print_json(names);
        }
        for name in names {
            println!("{name}");
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct BookmarkGroup<'a> {
    category: &'a str,
    bookmarks: &'a [&'a BookmarkRecord],
}

/// A password record as shown to the user; the password may be masked.
#[derive(Debug, Serialize)]
pub struct PasswordView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub source: &'a str,
    pub description: &'a str,
    pub account: &'a str,
    pub password: String,
    pub created_time: &'a str,
    pub updated_time: &'a str,
}

impl<'a> PasswordView<'a> {
    pub fn new(record: &'a PasswordRecord, reveal: bool) -> Self {
        Self {
            id: &record.id,
            title: &record.title,
            source: &record.source,
            description: &record.description,
            account: &record.account,
            password: if reveal {
                record.password.clone()
            } else {
                mask_secret(&record.password)
            },
            created_time: &record.created_time,
            updated_time: &record.updated_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_view_masks_unless_revealed() {
        let record = PasswordRecord::new("Mail", "Gmail", "", "a@b.com", "correct-horse-battery");
        assert_eq!(PasswordView::new(&record, false).password, "co...ry");
        assert_eq!(
            PasswordView::new(&record, true).password,
            "correct-horse-battery"
        );
    }

    #[test]
    fn masked_view_serializes_without_the_secret() {
        let record = PasswordRecord::new("Mail", "", "", "", "hunter2");
        let json = serde_json::to_string(&PasswordView::new(&record, false)).unwrap();
        assert!(json.contains("\"password\":\"****\""));
        assert!(!json.contains("hunter2"));
    }
}
