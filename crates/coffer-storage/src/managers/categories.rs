// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bookmark categories: unique names, a protected `default`, built-in seeding.

use coffer_core::{CategoryPatch, CategoryRecord, CofferError, KeyMode, DEFAULT_CATEGORY};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::collection::Collection;
use crate::store::{CollectionPaths, LoadOutcome};

/// Categories created when no category file exists: (name, description, color).
pub const BUILTIN_CATEGORIES: [(&str, &str, &str); 5] = [
    (DEFAULT_CATEGORY, "Default bookmark category", "#007acc"),
    ("work", "Work and study bookmarks", "#28a745"),
    ("leisure", "Entertainment and leisure bookmarks", "#dc3545"),
    ("tools", "Utilities and software bookmarks", "#ffc107"),
    ("development", "Programming and development bookmarks", "#6f42c1"),
];

fn builtin_records() -> Vec<CategoryRecord> {
    BUILTIN_CATEGORIES
        .iter()
        .map(|(name, description, color)| CategoryRecord::new(*name, *description, *color))
        .collect()
}

#[derive(Debug)]
pub struct CategoryManager {
    collection: Collection<CategoryRecord>,
}

impl CategoryManager {
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

    /// Load categories, seeding the built-ins when no file exists.
    ///
    /// A degraded load keeps the built-ins in memory only and refuses writes
    /// until the file is readable again.
    pub fn load(&mut self) -> Result<LoadOutcome, CofferError> {
        match self.collection.load()? {
            LoadOutcome::Empty => {
                let seeded = builtin_records();
                let count = seeded.len();
                match self.collection.commit(seeded.clone()) {
                    Ok(()) => {
                        info!(count, "created built-in bookmark categories");
                        Ok(LoadOutcome::Seeded { count })
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to persist built-in categories");
                        self.collection.set_unsaved(seeded);
                        self.collection.mark_degraded();
                        Ok(LoadOutcome::Degraded {
                            reason: e.to_string(),
                        })
                    }
                }
            }
            degraded @ LoadOutcome::Degraded { .. } => {
                self.collection.set_unsaved(builtin_records());
                Ok(degraded)
            }
            outcome => Ok(outcome),
        }
    }

    /// Add a category. Fails with `DuplicateName` before anything is written.
    pub fn add(
        &mut self,
        name: &str,
        description: &str,
        color: &str,
    ) -> Result<CategoryRecord, CofferError> {
        if self.get_by_name(name).is_some() {
            return Err(CofferError::DuplicateName {
                name: name.to_string(),
            });
        }
        let record = self
            .collection
            .add(CategoryRecord::new(name, description, color))?;
        debug!(id = %record.id, name, "category added");
        Ok(record)
    }

    /// Update a category. Renaming onto another category's name fails with
    /// `DuplicateName` before anything is written.
    pub fn update(&mut self, id: &str, patch: CategoryPatch) -> Result<bool, CofferError> {
        if self.collection.get(id).is_none() {
            return Ok(false);
        }
        if let Some(name) = &patch.name
            && self
                .collection
                .records()
                .iter()
                .any(|c| c.name == *name && c.id != id)
        {
            return Err(CofferError::DuplicateName { name: name.clone() });
        }
        self.collection.update_with(id, |record| record.apply(patch))
    }

    /// Delete a category. The `default` category is protected.
    ///
    /// Bookmarks in the deleted category are left as they are.
    pub fn delete(&mut self, id: &str) -> Result<bool, CofferError> {
        let Some(record) = self.collection.get(id) else {
            return Ok(false);
        };
        if record.is_default() {
            return Err(CofferError::ProtectedRecord {
                name: record.name.clone(),
            });
        }
        self.collection.delete(id)
    }

    /// Case-insensitive match over name and description.
    pub fn search(&self, query: &str) -> Vec<&CategoryRecord> {
        self.collection.search(query)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&CategoryRecord> {
        self.collection.get(id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&CategoryRecord> {
        self.collection.records().iter().find(|c| c.name == name)
    }

    pub fn get_all(&self) -> &[CategoryRecord] {
        self.collection.records()
    }

    /// Category names in collection order.
    pub fn get_names(&self) -> Vec<&str> {
        self.collection
            .records()
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.collection.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.records().is_empty()
    }

    pub(crate) fn collection(&self) -> &Collection<CategoryRecord> {
        &self.collection
    }

    pub(crate) fn collection_mut(&mut self) -> &mut Collection<CategoryRecord> {
        &mut self.collection
    }
}
