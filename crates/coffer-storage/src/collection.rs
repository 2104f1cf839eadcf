// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record list backed by a [`CollectionStore`].
//!
//! Every mutation builds the next list, saves it, and only then replaces the
//! in-memory copy. A failed save leaves memory exactly as it was. After a
//! degraded load every mutation is refused, so the unreadable file on disk
//! is never overwritten by the empty stand-in.

use coffer_core::{CofferError, KeyMode, Record};
use secrecy::SecretString;

use crate::migration;
use crate::store::{CollectionPaths, CollectionStore, LoadOutcome};

#[derive(Debug)]
pub struct Collection<R: Record> {
    store: CollectionStore<R>,
    records: Vec<R>,
    degraded: bool,
}

impl<R: Record> Collection<R> {
    pub fn new(paths: CollectionPaths) -> Self {
        Self {
            store: CollectionStore::new(paths),
            records: Vec::new(),
            degraded: false,
        }
    }

    pub fn configure_encryption(
        &mut self,
        key_material: SecretString,
        mode: KeyMode,
    ) -> Result<(), CofferError> {
        self.store.configure_encryption(key_material, mode)
    }

    pub fn load(&mut self) -> Result<LoadOutcome, CofferError> {
        let loaded = self.store.load()?;
        self.records = loaded.records;
        self.degraded = loaded.outcome.is_degraded();
        Ok(loaded.outcome)
    }

    /// True when the last load could not read the collection.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Refuse further writes, e.g. when seeding the collection failed.
    pub(crate) fn mark_degraded(&mut self) {
        self.degraded = true;
    }

    /// Fails while the in-memory records do not reflect the file on disk.
    pub(crate) fn ensure_writable(&self) -> Result<(), CofferError> {
        if self.degraded {
            let paths = self.store.paths();
            let file = if self.store.is_encrypted() {
                &paths.encrypted
            } else {
                &paths.plaintext
            };
            return Err(CofferError::Storage {
                message: format!(
                    "the {} collection could not be read; repair or remove {} before changing it",
                    R::KIND,
                    file.display()
                ),
                source: None,
            });
        }
        Ok(())
    }

    /// Replace the in-memory records without persisting them.
    pub(crate) fn set_unsaved(&mut self, records: Vec<R>) {
        self.records = records;
    }

    pub fn store(&self) -> &CollectionStore<R> {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut CollectionStore<R> {
        &mut self.store
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Records matching `query` case-insensitively, in collection order.
    pub fn search(&self, query: &str) -> Vec<&R> {
        let needle = query.to_lowercase();
        self.records.iter().filter(|r| r.matches(&needle)).collect()
    }

    /// Save `next` and adopt it as the in-memory list.
    pub(crate) fn commit(&mut self, next: Vec<R>) -> Result<(), CofferError> {
        self.ensure_writable()?;
        self.store.save(&next)?;
        self.records = next;
        Ok(())
    }

    /// Prepend `record` and persist.
    pub fn add(&mut self, record: R) -> Result<R, CofferError> {
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend(self.records.iter().cloned());
        self.commit(next)?;
        Ok(record)
    }

    /// Apply `edit` to the record with `id` and persist. `false` if absent.
    pub fn update_with(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut R),
    ) -> Result<bool, CofferError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.records.clone();
        edit(&mut next[index]);
        self.commit(next)?;
        Ok(true)
    }

    /// Remove the record with `id` and persist. `false` if absent.
    pub fn delete(&mut self, id: &str) -> Result<bool, CofferError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.records.clone();
        next.remove(index);
        self.commit(next)?;
        Ok(true)
    }

    /// Write the in-memory records back as plaintext and drop encryption.
    pub(crate) fn decrypt_to_plaintext(&mut self) -> Result<(), CofferError> {
        migration::decrypt_to_plaintext(self.store.paths(), &self.records)?;
        self.store.decrypted();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::PasswordRecord;
    use tempfile::tempdir;

    #[test]
    fn failed_save_rolls_back_memory() {
        let dir = tempdir().unwrap();
        let mut collection: Collection<PasswordRecord> =
            Collection::new(CollectionPaths::new(dir.path(), "passwords"));
        collection.load().unwrap();
        let first = collection
            .add(PasswordRecord::new("first", "", "", "", ""))
            .unwrap();

        // A data directory that is a regular file makes every write fail.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        let mut broken: Collection<PasswordRecord> =
            Collection::new(CollectionPaths::new(&blocked, "passwords"));
        broken.set_unsaved(collection.records().to_vec());

        let err = broken
            .update_with(&first.id, |r| r.title = "changed".into())
            .unwrap_err();
        assert!(matches!(err, CofferError::Storage { .. }));
        assert_eq!(broken.records()[0].title, "first");

        assert!(broken.add(PasswordRecord::new("second", "", "", "", "")).is_err());
        assert_eq!(broken.records().len(), 1);
        assert!(broken.delete(&first.id).is_err());
        assert_eq!(broken.records().len(), 1);
    }

    #[test]
    fn degraded_collection_refuses_writes_and_keeps_the_file() {
        let dir = tempdir().unwrap();
        let plaintext = dir.path().join("passwords.json");
        std::fs::write(&plaintext, "[{\"title\": \"mail\",").unwrap();

        let mut collection: Collection<PasswordRecord> =
            Collection::new(CollectionPaths::new(dir.path(), "passwords"));
        assert!(collection.load().unwrap().is_degraded());
        assert!(collection.is_degraded());

        let err = collection
            .add(PasswordRecord::new("new", "", "", "", "p"))
            .unwrap_err();
        assert!(matches!(err, CofferError::Storage { .. }));
        assert!(collection.records().is_empty());
        assert_eq!(
            std::fs::read_to_string(&plaintext).unwrap(),
            "[{\"title\": \"mail\","
        );

        // Once the file is repaired, a reload clears the flag.
        std::fs::write(&plaintext, "[]").unwrap();
        collection.load().unwrap();
        collection
            .add(PasswordRecord::new("new", "", "", "", "p"))
            .unwrap();
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let dir = tempdir().unwrap();
        let mut collection: Collection<PasswordRecord> =
            Collection::new(CollectionPaths::new(dir.path(), "passwords"));
        assert!(!collection.update_with("nope", |_| {}).unwrap());
        assert!(!collection.delete("nope").unwrap());
        assert!(!dir.path().join("passwords.json").exists());
    }
}
