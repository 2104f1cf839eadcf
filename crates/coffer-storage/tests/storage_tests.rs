// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for collection storage and the record managers.

use std::path::Path;

use coffer_core::{CofferError, KeyMode, PasswordRecord};
use coffer_storage::{
    BookmarkManager, CategoryManager, CollectionPaths, CollectionStore, LoadOutcome,
    PasswordManager,
};
use secrecy::SecretString;
use tempfile::tempdir;

fn passwords(dir: &Path, key: Option<&str>, mode: KeyMode) -> PasswordManager {
    let mut manager = PasswordManager::new(CollectionPaths::new(dir, "passwords"));
    if let Some(key) = key {
        manager
            .configure_encryption(SecretString::from(key), mode)
            .unwrap();
    }
    manager
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn gmail_search_survives_reload() {
    let dir = tempdir().unwrap();
    for mode in [KeyMode::Simple, KeyMode::Derived] {
        let _ = std::fs::remove_file(dir.path().join("passwords.enc"));

        let mut manager = passwords(dir.path(), Some("passphrase"), mode);
        manager.load().unwrap();
        let added = manager.add("Mail", "Gmail", "", "a@b.com", "p1").unwrap();

        let mut reloaded = passwords(dir.path(), Some("passphrase"), mode);
        assert_eq!(reloaded.load().unwrap(), LoadOutcome::Encrypted { count: 1 });

        let hits = reloaded.search("gmail");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], &added);
        assert_eq!(hits[0].password, "p1");
        assert!(reloaded.search("zzz").is_empty());
    }
}

#[test]
fn simple_key_bookmark_file_has_string_flag_and_empty_salt() {
    let dir = tempdir().unwrap();
    let mut bookmarks = BookmarkManager::new(CollectionPaths::new(dir.path(), "bookmarks"));
    bookmarks
        .configure_encryption(SecretString::from("abcd1234"), KeyMode::Simple)
        .unwrap();
    bookmarks.load().unwrap();
    bookmarks
        .add("Rust", "https://www.rust-lang.org", "", "development")
        .unwrap();

    let envelope = read_json(&dir.path().join("bookmarks.enc"));
    assert_eq!(envelope["use_simple_key"], "True");
    assert_eq!(envelope["salt"], "");
    assert!(!dir.path().join("bookmarks.json").exists());
}

#[test]
fn derived_key_file_records_its_salt() {
    let dir = tempdir().unwrap();
    let mut manager = passwords(dir.path(), Some("abcd1234"), KeyMode::Derived);
    manager.load().unwrap();
    manager.add("Mail", "", "", "", "").unwrap();

    let envelope = read_json(&dir.path().join("passwords.enc"));
    assert_eq!(envelope["use_simple_key"], "False");
    assert_ne!(envelope["salt"], "");
}

#[test]
fn migration_runs_exactly_once() {
    let dir = tempdir().unwrap();
    let mut plain = passwords(dir.path(), None, KeyMode::Simple);
    plain.load().unwrap();
    plain.add("A", "", "", "", "1").unwrap();
    plain.add("B", "", "", "", "2").unwrap();
    let plaintext = dir.path().join("passwords.json");
    assert!(plaintext.exists());

    let mut first = passwords(dir.path(), Some("key"), KeyMode::Simple);
    assert_eq!(first.load().unwrap(), LoadOutcome::Migrated { count: 2 });
    assert!(!plaintext.exists());
    assert!(dir.path().join("passwords.enc").exists());

    let mut second = passwords(dir.path(), Some("key"), KeyMode::Simple);
    assert_eq!(second.load().unwrap(), LoadOutcome::Encrypted { count: 2 });
    let titles: Vec<&str> = second.get_all().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["B", "A"]);
}

#[test]
fn wrong_key_is_an_access_code_error_not_an_empty_collection() {
    let dir = tempdir().unwrap();
    let mut manager = passwords(dir.path(), Some("right"), KeyMode::Simple);
    manager.load().unwrap();
    manager.add("Mail", "", "", "", "").unwrap();

    let mut wrong = passwords(dir.path(), Some("wrong"), KeyMode::Simple);
    let err = wrong.load().unwrap_err();
    assert!(err.is_access_code());
    assert!(wrong.is_empty());
}

#[test]
fn malformed_envelope_degrades_and_is_left_alone() {
    let dir = tempdir().unwrap();
    let encrypted = dir.path().join("passwords.enc");
    std::fs::write(&encrypted, "{\"iv\": 5}").unwrap();

    let mut manager = passwords(dir.path(), Some("key"), KeyMode::Simple);
    let outcome = manager.load().unwrap();
    assert!(outcome.is_degraded());
    assert!(manager.is_empty());
    assert_eq!(std::fs::read_to_string(&encrypted).unwrap(), "{\"iv\": 5}");
}

#[test]
fn insertion_order_is_newest_first_across_reload() {
    let dir = tempdir().unwrap();
    let mut manager = passwords(dir.path(), None, KeyMode::Simple);
    manager.load().unwrap();
    for title in ["A", "B", "C"] {
        manager.add(title, "", "", "", "").unwrap();
    }

    let mut reloaded = passwords(dir.path(), None, KeyMode::Simple);
    reloaded.load().unwrap();
    let titles: Vec<&str> = reloaded.get_all().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["C", "B", "A"]);
}

#[test]
fn default_category_protection_leaves_file_unchanged() {
    let dir = tempdir().unwrap();
    let mut categories =
        CategoryManager::new(CollectionPaths::new(dir.path(), "bookmark_categories"));
    categories
        .configure_encryption(SecretString::from("key"), KeyMode::Simple)
        .unwrap();
    assert_eq!(categories.load().unwrap(), LoadOutcome::Seeded { count: 5 });

    let file = dir.path().join("bookmark_categories.enc");
    let before = std::fs::read_to_string(&file).unwrap();
    let default_id = categories.get_by_name("default").unwrap().id.clone();

    assert!(matches!(
        categories.delete(&default_id),
        Err(CofferError::ProtectedRecord { .. })
    ));
    assert_eq!(categories.len(), 5);
    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn duplicate_category_performs_no_write() {
    let dir = tempdir().unwrap();
    let mut categories =
        CategoryManager::new(CollectionPaths::new(dir.path(), "bookmark_categories"));
    categories.load().unwrap();
    let file = dir.path().join("bookmark_categories.json");
    let modified = std::fs::metadata(&file).unwrap().modified().unwrap();
    let before = std::fs::read_to_string(&file).unwrap();

    let err = categories.add("tools", "", "#000000").unwrap_err();
    assert!(matches!(err, CofferError::DuplicateName { name } if name == "tools"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
    assert_eq!(std::fs::metadata(&file).unwrap().modified().unwrap(), modified);

    // Case-sensitive: "Tools" is a different name.
    categories.add("Tools", "", "#000000").unwrap();
    assert_eq!(categories.len(), 6);
}

#[test]
fn store_encode_produces_an_envelope_for_another_key() {
    let dir = tempdir().unwrap();
    let store: CollectionStore<PasswordRecord> =
        CollectionStore::new(CollectionPaths::new(dir.path(), "passwords"));
    let records = vec![PasswordRecord::new("Mail", "", "", "", "p1")];

    let json = store.encode(&records, "other", KeyMode::Simple).unwrap();
    let envelope = coffer_vault::Envelope::from_json(&json).unwrap();
    let back: Vec<PasswordRecord> = coffer_vault::decrypt_json(&envelope, "other").unwrap();
    assert_eq!(back, records);
}
