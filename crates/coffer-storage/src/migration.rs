// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moving a collection between its plaintext and encrypted files.
//!
//! Both directions write the new file first and delete the old one only
//! after the write succeeded, so a crash leaves at least one readable copy.

use coffer_core::{CofferError, Record};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::store::{CollectionPaths, Encryption, write_atomic};

/// Encrypt plaintext records into `<stem>.enc`, then delete `<stem>.json`.
///
/// If the encrypted write fails the plaintext file is untouched. If only the
/// deletion fails the encrypted file is already authoritative and the
/// failure is logged.
pub(crate) fn encrypt_plaintext<R: Record>(
    paths: &CollectionPaths,
    records: &[R],
    encryption: &Encryption,
) -> Result<(), CofferError> {
    let envelope = coffer_vault::encrypt_json(
        records,
        encryption.key_material.expose_secret(),
        encryption.mode,
    )
    .map_err(|e| CofferError::storage("failed to encrypt plaintext collection", e))?;
    write_atomic(&paths.encrypted, &envelope.to_json()?)?;

    match std::fs::remove_file(&paths.plaintext) {
        Ok(()) => info!(
            kind = R::KIND,
            count = records.len(),
            path = %paths.encrypted.display(),
            "migrated plaintext collection to encrypted storage"
        ),
        Err(e) => warn!(
            path = %paths.plaintext.display(),
            error = %e,
            "collection encrypted but the plaintext file could not be removed"
        ),
    }
    Ok(())
}

/// Write records back to `<stem>.json`, then delete `<stem>.enc`.
pub(crate) fn decrypt_to_plaintext<R: Record>(
    paths: &CollectionPaths,
    records: &[R],
) -> Result<(), CofferError> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| CofferError::storage("failed to serialize collection", e))?;
    write_atomic(&paths.plaintext, &json)?;

    match std::fs::remove_file(&paths.encrypted) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(CofferError::storage(
                format!(
                    "plaintext written but {} could not be removed",
                    paths.encrypted.display()
                ),
                e,
            ));
        }
    }
    info!(
        kind = R::KIND,
        count = records.len(),
        path = %paths.plaintext.display(),
        "collection decrypted to plaintext"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::{KeyMode, PasswordRecord};
    use secrecy::SecretString;
    use tempfile::tempdir;

    #[test]
    fn failed_encrypted_write_leaves_plaintext_alone() {
        let dir = tempdir().unwrap();
        let paths = CollectionPaths {
            plaintext: dir.path().join("passwords.json"),
            // A path below a regular file cannot be created.
            encrypted: dir.path().join("passwords.json/passwords.enc"),
        };
        std::fs::write(&paths.plaintext, "[]").unwrap();
        let encryption = Encryption {
            key_material: SecretString::from("key"),
            mode: KeyMode::Simple,
        };

        let records = vec![PasswordRecord::new("a", "", "", "", "")];
        assert!(encrypt_plaintext(&paths, &records, &encryption).is_err());
        assert_eq!(std::fs::read_to_string(&paths.plaintext).unwrap(), "[]");
    }

    #[test]
    fn decrypt_replaces_encrypted_file() {
        let dir = tempdir().unwrap();
        let paths = CollectionPaths::new(dir.path(), "passwords");
        std::fs::write(&paths.encrypted, "{}").unwrap();

        let records = vec![PasswordRecord::new("a", "", "", "", "pw")];
        decrypt_to_plaintext(&paths, &records).unwrap();

        assert!(!paths.encrypted.exists());
        let raw = std::fs::read_to_string(&paths.plaintext).unwrap();
        assert!(raw.contains("\"pw\""));
    }
}
