// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unlocking the vault for a CLI invocation.

use coffer_config::CofferConfig;
use coffer_core::CofferError;
use coffer_storage::{Coffer, CofferOptions, VaultPaths};
use coffer_vault::prompt::ACCESS_CODE_ENV_VAR;
use coffer_vault::{get_access_code, get_access_code_with_confirm};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

/// Open and load the vault described by `config`.
///
/// With encryption on, the access code is read from the environment or a
/// prompt. A vault with no encrypted files yet asks for the code twice.
pub fn open_vault(config: &CofferConfig, encrypt: bool) -> Result<Coffer, CofferError> {
    let paths = VaultPaths::from_config(&config.storage);
    let access_code = if encrypt {
        Some(read_access_code(&paths)?)
    } else {
        None
    };
    open_with(config, access_code.as_ref())
}

/// Open and load the vault with an access code the caller already holds.
pub fn open_with(
    config: &CofferConfig,
    access_code: Option<&SecretString>,
) -> Result<Coffer, CofferError> {
    let paths = VaultPaths::from_config(&config.storage);
    let options = CofferOptions::from_config(&config.vault);
    let mut coffer = Coffer::open(paths, access_code, options)?;
    let report = coffer.load()?;
    debug!(?report, "vault loaded");
    if report.is_degraded() {
        warn!("some collections could not be read; they are shown empty and refuse changes until repaired");
    }
    Ok(coffer)
}

fn read_access_code(paths: &VaultPaths) -> Result<SecretString, CofferError> {
    if paths.any_encrypted() {
        return get_access_code();
    }
    let (code, confirm) = get_access_code_with_confirm(ACCESS_CODE_ENV_VAR, "New access code")?;
    ensure_same(&code, &confirm)?;
    Ok(code)
}

/// Both entries of a confirmed prompt must match.
pub fn ensure_same(code: &SecretString, confirm: &SecretString) -> Result<(), CofferError> {
    if code.expose_secret() != confirm.expose_secret() {
        return Err(CofferError::Validation(
            "the access codes do not match".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let a = SecretString::from("1234");
        let b = SecretString::from("1235");
        assert!(ensure_same(&a, &a).is_ok());
        assert!(matches!(ensure_same(&a, &b), Err(CofferError::Validation(_))));
    }

    #[test]
    fn plaintext_vault_opens_without_a_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CofferConfig::default();
        config.storage.data_dir = dir.path().display().to_string();

        let coffer = open_vault(&config, false).unwrap();
        assert!(!coffer.is_encrypted());
        assert_eq!(coffer.categories().len(), 5);
    }
}
