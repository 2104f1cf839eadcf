// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-collection persistence: decides which file is authoritative, loads it,
//! migrates plaintext to ciphertext and writes saves atomically.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use coffer_core::{CofferError, KeyMode, Record};
use coffer_vault::{Envelope, decrypt_json, encrypt_json};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::migration;

/// The two files a collection may live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPaths {
    /// `<stem>.json`
    pub plaintext: PathBuf,
    /// `<stem>.enc`
    pub encrypted: PathBuf,
}

impl CollectionPaths {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            plaintext: dir.join(format!("{stem}.json")),
            encrypted: dir.join(format!("{stem}.enc")),
        }
    }
}

/// Key material and key mode for an encrypted collection.
#[derive(Debug)]
pub struct Encryption {
    pub key_material: SecretString,
    pub mode: KeyMode,
}

/// Immutable store configuration.
///
/// A store starts plaintext-only; [`CollectionStore::configure_encryption`]
/// replaces it with an encrypted configuration exactly once.
#[derive(Debug)]
pub struct StoreConfig {
    pub paths: CollectionPaths,
    pub encryption: Option<Encryption>,
}

/// What a load found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Read and decrypted the encrypted file.
    Encrypted { count: usize },
    /// Read the plaintext file (no encryption configured, or an empty array
    /// waiting for its first encrypted save).
    Plaintext { count: usize },
    /// Encrypted a plaintext file and removed it.
    Migrated { count: usize },
    /// Neither file exists.
    Empty,
    /// Built-in records were created because no file existed.
    Seeded { count: usize },
    /// Loading failed; the collection is empty in memory and nothing on disk
    /// was touched.
    Degraded { reason: String },
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Records produced by [`CollectionStore::load`].
#[derive(Debug)]
pub struct Loaded<R> {
    pub records: Vec<R>,
    pub outcome: LoadOutcome,
}

/// Owns the on-disk representation of one collection.
#[derive(Debug)]
pub struct CollectionStore<R> {
    config: StoreConfig,
    loaded: bool,
    stale_plaintext: bool,
    _records: PhantomData<fn() -> R>,
}

impl<R: Record> CollectionStore<R> {
    /// Plaintext-only store over `paths`.
    pub fn new(paths: CollectionPaths) -> Self {
        Self {
            config: StoreConfig {
                paths,
                encryption: None,
            },
            loaded: false,
            stale_plaintext: false,
            _records: PhantomData,
        }
    }

    /// Switch the store to encrypted mode. Allowed once, before the first load.
    pub fn configure_encryption(
        &mut self,
        key_material: SecretString,
        mode: KeyMode,
    ) -> Result<(), CofferError> {
        if self.config.encryption.is_some() {
            return Err(CofferError::Validation(format!(
                "encryption is already configured for the {} collection",
                R::KIND
            )));
        }
        if self.loaded {
            return Err(CofferError::Validation(format!(
                "encryption must be configured before the {} collection is loaded",
                R::KIND
            )));
        }
        self.config.encryption = Some(Encryption { key_material, mode });
        Ok(())
    }

    /// Replace the key after a successful re-key.
    pub(crate) fn rekeyed(&mut self, key_material: SecretString, mode: KeyMode) {
        self.config.encryption = Some(Encryption { key_material, mode });
        self.stale_plaintext = false;
    }

    /// Drop encryption after the collection has been written back as plaintext.
    pub(crate) fn decrypted(&mut self) {
        self.config.encryption = None;
        self.stale_plaintext = false;
    }

    pub fn paths(&self) -> &CollectionPaths {
        &self.config.paths
    }

    pub fn is_encrypted(&self) -> bool {
        self.config.encryption.is_some()
    }

    pub fn mode(&self) -> Option<KeyMode> {
        self.config.encryption.as_ref().map(|e| e.mode)
    }

    pub(crate) fn key_material(&self) -> Option<&SecretString> {
        self.config.encryption.as_ref().map(|e| &e.key_material)
    }

    /// Load the collection.
    ///
    /// Only a wrong access code is returned as an error. Every other failure
    /// is logged and degrades to an empty collection.
    pub fn load(&mut self) -> Result<Loaded<R>, CofferError> {
        self.loaded = true;
        match self.try_load() {
            Ok(loaded) => Ok(loaded),
            Err(CofferError::AccessCode) => Err(CofferError::AccessCode),
            Err(e) => {
                warn!(
                    kind = R::KIND,
                    error = %e,
                    "failed to load collection -- continuing with an empty one"
                );
                Ok(Loaded {
                    records: Vec::new(),
                    outcome: LoadOutcome::Degraded {
                        reason: e.to_string(),
                    },
                })
            }
        }
    }

    fn try_load(&mut self) -> Result<Loaded<R>, CofferError> {
        let paths = &self.config.paths;

        if let Some(encryption) = &self.config.encryption
            && paths.encrypted.exists()
        {
            let records = read_encrypted(&paths.encrypted, encryption)?;
            info!(kind = R::KIND, count = records.len(), "loaded encrypted collection");
            // A plaintext file next to the envelope is left over and stale.
            self.stale_plaintext = paths.plaintext.exists();
            return Ok(Loaded {
                outcome: LoadOutcome::Encrypted {
                    count: records.len(),
                },
                records,
            });
        }

        if paths.plaintext.exists() {
            let records: Vec<R> = read_plaintext(&paths.plaintext)?;
            let count = records.len();

            let outcome = match &self.config.encryption {
                Some(encryption) if count > 0 => {
                    migration::encrypt_plaintext(paths, &records, encryption)?;
                    LoadOutcome::Migrated { count }
                }
                Some(_) => {
                    debug!(
                        path = %paths.plaintext.display(),
                        "empty plaintext collection will be removed on the next save"
                    );
                    self.stale_plaintext = true;
                    LoadOutcome::Plaintext { count }
                }
                None => LoadOutcome::Plaintext { count },
            };
            info!(kind = R::KIND, count, "loaded plaintext collection");
            return Ok(Loaded { records, outcome });
        }

        if self.config.encryption.is_none() && paths.encrypted.exists() {
            warn!(
                path = %paths.encrypted.display(),
                "encrypted collection found but no access code was supplied"
            );
        }
        debug!(kind = R::KIND, "no collection file found");
        Ok(Loaded {
            records: Vec::new(),
            outcome: LoadOutcome::Empty,
        })
    }

    /// Persist `records` to the authoritative file.
    pub fn save(&mut self, records: &[R]) -> Result<(), CofferError> {
        match &self.config.encryption {
            Some(encryption) => {
                let json = self
                    .encode(
                        records,
                        encryption.key_material.expose_secret(),
                        encryption.mode,
                    )
                    .map_err(|e| CofferError::storage("failed to encrypt collection", e))?;
                write_atomic(&self.config.paths.encrypted, &json)?;

                if self.stale_plaintext {
                    remove_stale(&self.config.paths.plaintext);
                    self.stale_plaintext = false;
                }
            }
            None => {
                let json = serde_json::to_string_pretty(records)
                    .map_err(|e| CofferError::storage("failed to serialize collection", e))?;
                write_atomic(&self.config.paths.plaintext, &json)?;
            }
        }
        debug!(kind = R::KIND, count = records.len(), "collection saved");
        Ok(())
    }

    /// Envelope JSON for `records` under an arbitrary key.
    pub fn encode(
        &self,
        records: &[R],
        key_material: &str,
        mode: KeyMode,
    ) -> Result<String, CofferError> {
        encrypt_json(records, key_material, mode)?.to_json()
    }
}

fn read_encrypted<R: Record>(path: &Path, encryption: &Encryption) -> Result<Vec<R>, CofferError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CofferError::storage(format!("failed to read {}", path.display()), e))?;
    let envelope = Envelope::from_json(&raw)
        .map_err(|e| CofferError::storage(format!("malformed envelope in {}", path.display()), e))?;

    decrypt_json(&envelope, encryption.key_material.expose_secret()).map_err(|e| {
        debug!(path = %path.display(), error = %e, "decryption failed");
        CofferError::AccessCode
    })
}

pub(crate) fn read_plaintext<R: Record>(path: &Path) -> Result<Vec<R>, CofferError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CofferError::storage(format!("failed to read {}", path.display()), e))?;
    serde_json::from_str(&raw)
        .map_err(|e| CofferError::storage(format!("malformed JSON in {}", path.display()), e))
}

/// Write `contents` to `path` through a sibling temporary file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), CofferError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| {
        CofferError::storage(format!("failed to create directory {}", dir.display()), e)
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| CofferError::storage("failed to create temporary file", e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| CofferError::storage(format!("failed to write {}", path.display()), e))?;
    tmp.persist(path).map_err(|e| {
        CofferError::storage(format!("failed to replace {}", path.display()), e.error)
    })?;
    Ok(())
}

pub(crate) fn remove_stale(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => info!(path = %path.display(), "removed stale plaintext collection"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove stale plaintext file"),
    }
}
