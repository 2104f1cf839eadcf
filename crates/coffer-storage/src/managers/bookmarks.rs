// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bookmark entries and their grouping by category.

use std::collections::BTreeSet;

use coffer_core::{BookmarkPatch, BookmarkRecord, CofferError, KeyMode};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::collection::Collection;
use crate::store::{CollectionPaths, LoadOutcome};

#[derive(Debug)]
pub struct BookmarkManager {
    collection: Collection<BookmarkRecord>,
}

impl BookmarkManager {
    pub fn new(paths: CollectionPaths) -> Self {
        Self {
            collection: Collection::new(paths),
        }
    }

    pub fn configure_encryption(
        &mut self,
        key_material: SecretString,
        mode: KeyMode,
    ) -> Result<(), CofferError> {
        self.collection.configure_encryption(key_material, mode)
    }

    pub fn load(&mut self) -> Result<LoadOutcome, CofferError> {
        self.collection.load()
    }

    pub fn add(
        &mut self,
        title: &str,
        url: &str,
        description: &str,
        category: &str,
    ) -> Result<BookmarkRecord, CofferError> {
        let record = self
            .collection
            .add(BookmarkRecord::new(title, url, description, category))?;
        debug!(id = %record.id, category = %record.category, "bookmark added");
        Ok(record)
    }

    pub fn update(&mut self, id: &str, patch: BookmarkPatch) -> Result<bool, CofferError> {
        self.collection.update_with(id, |record| record.apply(patch))
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, CofferError> {
        self.collection.delete(id)
    }

    /// Case-insensitive match over title, url, description and category.
    pub fn search(&self, query: &str) -> Vec<&BookmarkRecord> {
        self.collection.search(query)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&BookmarkRecord> {
        self.collection.get(id)
    }

    pub fn get_all(&self) -> &[BookmarkRecord] {
        self.collection.records()
    }

    pub fn get_by_category(&self, name: &str) -> Vec<&BookmarkRecord> {
        self.collection
            .records()
            .iter()
            .filter(|b| b.category == name)
            .collect()
    }

    /// Distinct category names in use, sorted.
    pub fn get_all_category_names(&self) -> Vec<String> {
        self.collection
            .records()
            .iter()
            .map(|b| b.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Bookmarks grouped by category. Groups appear in the order their first
    /// bookmark appears; bookmarks keep collection order inside a group.
    pub fn get_grouped_by_category(&self) -> Vec<(String, Vec<&BookmarkRecord>)> {
        let mut groups: Vec<(String, Vec<&BookmarkRecord>)> = Vec::new();
        for bookmark in self.collection.records() {
            match groups.iter_mut().find(|(name, _)| *name == bookmark.category) {
                Some((_, members)) => members.push(bookmark),
                None => groups.push((bookmark.category.clone(), vec![bookmark])),
            }
        }
        groups
    }

    /// Move every bookmark in `from` to `to` with a single write.
    ///
    /// Returns how many bookmarks changed. Nothing is written when none match.
    pub fn reassign_category(&mut self, from: &str, to: &str) -> Result<usize, CofferError> {
        // An unreadable collection would report zero matches.
        self.collection.ensure_writable()?;
        let mut next = self.collection.records().to_vec();
        let mut changed = 0;
        for bookmark in next.iter_mut().filter(|b| b.category == from) {
            bookmark.apply(BookmarkPatch {
                category: Some(to.to_string()),
                ..Default::default()
            });
            changed += 1;
        }
        if changed > 0 {
            self.collection.commit(next)?;
            info!(from, to, count = changed, "bookmarks reassigned to another category");
        }
        Ok(changed)
    }

    pub fn len(&self) -> usize {
        self.collection.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.records().is_empty()
    }

    pub(crate) fn collection(&self) -> &Collection<BookmarkRecord> {
        &self.collection
    }

    pub(crate) fn collection_mut(&mut self) -> &mut Collection<BookmarkRecord> {
        &mut self.collection
    }
}
