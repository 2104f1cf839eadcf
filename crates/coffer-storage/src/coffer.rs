// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault facade: three managers over one data directory, unlocked by a
//! single access code.
//!
//! The access code itself is never used as key material. Its SHA-256
//! fingerprint is, and that is also what a passphrase change verifies the
//! old code against.

use std::path::Path;

use coffer_config::model::{StorageConfig, VaultConfig};
use coffer_core::{CofferError, DEFAULT_CATEGORY, KeyMode, Record};
use coffer_vault::fingerprint;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::collection::Collection;
use crate::managers::{BookmarkManager, CategoryManager, PasswordManager};
use crate::rekey::{self, RekeyJob};
use crate::store::{CollectionPaths, LoadOutcome, remove_stale};

/// Minimum access code length when none is configured.
pub const DEFAULT_MIN_ACCESS_CODE_LEN: usize = 4;

/// File locations of the three collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub passwords: CollectionPaths,
    pub bookmarks: CollectionPaths,
    pub categories: CollectionPaths,
}

impl VaultPaths {
    /// Default file stems inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::from_config(&StorageConfig {
            data_dir: dir.display().to_string(),
            ..Default::default()
        })
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        let dir = storage.data_dir();
        Self {
            passwords: CollectionPaths::new(dir, &storage.passwords_file),
            bookmarks: CollectionPaths::new(dir, &storage.bookmarks_file),
            categories: CollectionPaths::new(dir, &storage.categories_file),
        }
    }

    fn get(&self, slot: Slot) -> &CollectionPaths {
        match slot {
            Slot::Categories => &self.categories,
            Slot::Bookmarks => &self.bookmarks,
            Slot::Passwords => &self.passwords,
        }
    }

    fn all(&self) -> [&CollectionPaths; 3] {
        [&self.passwords, &self.bookmarks, &self.categories]
    }

    /// True when any collection has an encrypted file on disk.
    pub fn any_encrypted(&self) -> bool {
        self.all().iter().any(|p| p.encrypted.exists())
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Categories,
    Bookmarks,
    Passwords,
}

/// How an encrypted vault derives keys and validates access codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CofferOptions {
    pub mode: KeyMode,
    pub min_access_code_len: usize,
}

impl Default for CofferOptions {
    fn default() -> Self {
        Self {
            mode: KeyMode::Simple,
            min_access_code_len: DEFAULT_MIN_ACCESS_CODE_LEN,
        }
    }
}

impl CofferOptions {
    pub fn from_config(vault: &VaultConfig) -> Self {
        Self {
            mode: vault.key_mode,
            min_access_code_len: vault.min_access_code_len,
        }
    }
}

/// Per-collection result of [`Coffer::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub categories: LoadOutcome,
    pub bookmarks: LoadOutcome,
    pub passwords: LoadOutcome,
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        self.categories.is_degraded() || self.bookmarks.is_degraded() || self.passwords.is_degraded()
    }
}

/// Reject empty or too-short access codes.
pub fn validate_access_code(code: &str, min_len: usize) -> Result<(), CofferError> {
    if code.is_empty() {
        return Err(CofferError::Validation(
            "access code must not be empty".to_string(),
        ));
    }
    if code.chars().count() < min_len {
        return Err(CofferError::Validation(format!(
            "access code must be at least {min_len} characters"
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct Coffer {
    paths: VaultPaths,
    options: CofferOptions,
    passwords: PasswordManager,
    bookmarks: BookmarkManager,
    categories: CategoryManager,
    report: Option<LoadReport>,
}

impl Coffer {
    /// Open the vault. With an access code every collection is encrypted
    /// under its fingerprint; without one the collections stay plaintext,
    /// which is refused when encrypted files already exist.
    pub fn open(
        paths: VaultPaths,
        access_code: Option<&SecretString>,
        options: CofferOptions,
    ) -> Result<Self, CofferError> {
        let mut coffer = Self {
            passwords: PasswordManager::new(paths.passwords.clone()),
            bookmarks: BookmarkManager::new(paths.bookmarks.clone()),
            categories: CategoryManager::new(paths.categories.clone()),
            paths,
            options,
            report: None,
        };

        match access_code {
            Some(code) => {
                validate_access_code(code.expose_secret(), coffer.options.min_access_code_len)?;
                let key_material = fingerprint(code.expose_secret());
                let mode = coffer.options.mode;
                coffer
                    .passwords
                    .configure_encryption(SecretString::from(key_material.clone()), mode)?;
                coffer
                    .bookmarks
                    .configure_encryption(SecretString::from(key_material.clone()), mode)?;
                coffer
                    .categories
                    .configure_encryption(SecretString::from(key_material), mode)?;
            }
            None if coffer.paths.any_encrypted() => {
                return Err(CofferError::Validation(
                    "the collections are encrypted -- an access code is required".to_string(),
                ));
            }
            None => {}
        }
        Ok(coffer)
    }

    /// Load categories, bookmarks and passwords.
    ///
    /// Collections with an encrypted file are loaded first. Those loads only
    /// read, so a wrong access code stops the load before seeding or
    /// migration writes anything under the wrong key.
    pub fn load(&mut self) -> Result<LoadReport, CofferError> {
        let mut order = [Slot::Categories, Slot::Bookmarks, Slot::Passwords];
        order.sort_by_key(|slot| !self.paths.get(*slot).encrypted.exists());

        let mut report = LoadReport {
            categories: LoadOutcome::Empty,
            bookmarks: LoadOutcome::Empty,
            passwords: LoadOutcome::Empty,
        };
        for slot in order {
            match slot {
                Slot::Categories => report.categories = self.categories.load()?,
                Slot::Bookmarks => report.bookmarks = self.bookmarks.load()?,
                Slot::Passwords => report.passwords = self.passwords.load()?,
            }
        }
        if report.is_degraded() {
            warn!(?report, "one or more collections failed to load");
        }
        self.report = Some(report.clone());
        Ok(report)
    }

    pub fn is_encrypted(&self) -> bool {
        self.passwords.collection().store().is_encrypted()
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    pub fn passwords(&self) -> &PasswordManager {
        &self.passwords
    }

    pub fn passwords_mut(&mut self) -> &mut PasswordManager {
        &mut self.passwords
    }

    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    pub fn bookmarks_mut(&mut self) -> &mut BookmarkManager {
        &mut self.bookmarks
    }

    pub fn categories(&self) -> &CategoryManager {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryManager {
        &mut self.categories
    }

    /// Delete a category, optionally moving its bookmarks to `default`.
    ///
    /// Returns `None` when no category has `id`, otherwise the number of
    /// bookmarks reassigned (always 0 without `reassign`). Bookmarks are moved
    /// before the category is removed, so a failed move leaves the category
    /// in place.
    pub fn delete_category(&mut self, id: &str, reassign: bool) -> Result<Option<usize>, CofferError> {
        let Some(category) = self.categories.get_by_id(id) else {
            return Ok(None);
        };
        if category.is_default() {
            return Err(CofferError::ProtectedRecord {
                name: category.name.clone(),
            });
        }
        let name = category.name.clone();

        let moved = if reassign {
            self.bookmarks.reassign_category(&name, DEFAULT_CATEGORY)?
        } else {
            0
        };
        self.categories.delete(id)?;
        Ok(Some(moved))
    }

    /// Re-encrypt every collection under a new access code.
    pub fn change_passphrase(
        &mut self,
        old: &SecretString,
        new: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), CofferError> {
        let (current, mode) = {
            let store = self.passwords.collection().store();
            match (store.key_material(), store.mode()) {
                (Some(key), Some(mode)) => (key.expose_secret().to_string(), mode),
                _ => {
                    return Err(CofferError::Validation(
                        "encryption is not enabled".to_string(),
                    ));
                }
            }
        };
        if fingerprint(old.expose_secret()) != current {
            return Err(CofferError::AccessCode);
        }
        if new.expose_secret() != confirm.expose_secret() {
            return Err(CofferError::Validation(
                "the new access codes do not match".to_string(),
            ));
        }
        validate_access_code(new.expose_secret(), self.options.min_access_code_len)?;
        self.ensure_loaded_cleanly("change the access code")?;

        let key_material = fingerprint(new.expose_secret());
        let jobs = vec![
            rekey_job(self.passwords.collection(), &key_material, mode)?,
            rekey_job(self.bookmarks.collection(), &key_material, mode)?,
            rekey_job(self.categories.collection(), &key_material, mode)?,
        ];
        rekey::commit_all(&jobs)?;

        for paths in self.paths.all() {
            if paths.plaintext.exists() {
                remove_stale(&paths.plaintext);
            }
        }
        self.passwords
            .collection_mut()
            .store_mut()
            .rekeyed(SecretString::from(key_material.clone()), mode);
        self.bookmarks
            .collection_mut()
            .store_mut()
            .rekeyed(SecretString::from(key_material.clone()), mode);
        self.categories
            .collection_mut()
            .store_mut()
            .rekeyed(SecretString::from(key_material), mode);

        info!("access code changed");
        Ok(())
    }

    /// Write every collection back as plaintext and delete the encrypted files.
    pub fn decrypt(&mut self) -> Result<(), CofferError> {
        if !self.is_encrypted() {
            return Err(CofferError::Validation(
                "the collections are not encrypted".to_string(),
            ));
        }
        self.ensure_loaded_cleanly("decrypt the collections")?;

        self.passwords.collection_mut().decrypt_to_plaintext()?;
        self.bookmarks.collection_mut().decrypt_to_plaintext()?;
        self.categories.collection_mut().decrypt_to_plaintext()?;
        info!("all collections decrypted to plaintext");
        Ok(())
    }

    // Whole-vault rewrites work from memory, so memory must hold everything.
    fn ensure_loaded_cleanly(&self, action: &str) -> Result<(), CofferError> {
        match &self.report {
            None => Err(CofferError::Validation(format!(
                "load the vault before trying to {action}"
            ))),
            Some(report) if report.is_degraded() => Err(CofferError::Validation(format!(
                "refusing to {action} while a collection failed to load"
            ))),
            Some(_) => Ok(()),
        }
    }
}

fn rekey_job<R: Record>(
    collection: &Collection<R>,
    key_material: &str,
    mode: KeyMode,
) -> Result<RekeyJob, CofferError> {
    let store = collection.store();
    Ok(RekeyJob {
        target: store.paths().encrypted.clone(),
        contents: store.encode(collection.records(), key_material, mode)?,
    })
}
