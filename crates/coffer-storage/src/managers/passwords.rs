// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password entries.

use coffer_core::{CofferError, KeyMode, PasswordPatch, PasswordRecord};
use secrecy::SecretString;
use tracing::debug;

use crate::collection::Collection;
use crate::store::{CollectionPaths, LoadOutcome};

#[derive(Debug)]
pub struct PasswordManager {
    collection: Collection<PasswordRecord>,
}

impl PasswordManager {
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
        source: &str,
        description: &str,
        account: &str,
        password: &str,
    ) -> Result<PasswordRecord, CofferError> {
        let record = self.collection.add(PasswordRecord::new(
            title,
            source,
            description,
            account,
            password,
        ))?;
        debug!(id = %record.id, "password added");
        Ok(record)
    }

    pub fn update(&mut self, id: &str, patch: PasswordPatch) -> Result<bool, CofferError> {
        self.collection.update_with(id, |record| record.apply(patch))
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, CofferError> {
        self.collection.delete(id)
    }

    /// Case-insensitive match over title, source, description and account.
    pub fn search(&self, query: &str) -> Vec<&PasswordRecord> {
        self.collection.search(query)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&PasswordRecord> {
        self.collection.get(id)
    }

    pub fn get_all(&self) -> &[PasswordRecord] {
        self.collection.records()
    }

    pub fn len(&self) -> usize {
        self.collection.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.records().is_empty()
    }

    pub(crate) fn collection(&self) -> &Collection<PasswordRecord> {
        &self.collection
    }

    pub(crate) fn collection_mut(&mut self) -> &mut Collection<PasswordRecord> {
        &mut self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager(dir: &std::path::Path) -> PasswordManager {
        let mut manager = PasswordManager::new(CollectionPaths::new(dir, "passwords"));
        manager.load().unwrap();
        manager
    }

    #[test]
    fn add_prepends_newest_first() {
        let dir = tempdir().unwrap();
        let mut passwords = manager(dir.path());
        for title in ["A", "B", "C"] {
            passwords.add(title, "", "", "", "").unwrap();
        }
        let titles: Vec<&str> = passwords.get_all().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["C", "B", "A"]);
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let dir = tempdir().unwrap();
        let mut passwords = manager(dir.path());
        passwords.add("one", "", "", "", "").unwrap();
        passwords.add("two", "", "", "", "").unwrap();
        let all: Vec<&str> = passwords.search("").iter().map(|r| r.title.as_str()).collect();
        assert_eq!(all, ["two", "one"]);
    }

    #[test]
    fn search_does_not_look_at_the_password() {
        let dir = tempdir().unwrap();
        let mut passwords = manager(dir.path());
        passwords.add("Bank", "bank.example", "", "me", "zebra").unwrap();
        assert!(passwords.search("zebra").is_empty());
        assert_eq!(passwords.search("BANK").len(), 1);
    }

    #[test]
    fn update_keeps_created_time() {
        let dir = tempdir().unwrap();
        let mut passwords = manager(dir.path());
        let record = passwords.add("Mail", "", "", "", "old").unwrap();
        let patch = PasswordPatch {
            password: Some("new".into()),
            ..Default::default()
        };
        assert!(passwords.update(&record.id, patch).unwrap());

        let updated = passwords.get_by_id(&record.id).unwrap();
        assert_eq!(updated.password, "new");
        assert_eq!(updated.title, "Mail");
        assert_eq!(updated.created_time, record.created_time);
    }

    #[test]
    fn delete_removes_and_persists() {
        let dir = tempdir().unwrap();
        let mut passwords = manager(dir.path());
        let record = passwords.add("Mail", "", "", "", "").unwrap();
        assert!(passwords.delete(&record.id).unwrap());
        assert!(!passwords.delete(&record.id).unwrap());

        let reloaded = manager(dir.path());
        assert!(reloaded.is_empty());
    }
}
