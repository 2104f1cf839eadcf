// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::CofferConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CofferConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.to_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    let stems = [
        ("storage.passwords_file", &config.storage.passwords_file),
        ("storage.bookmarks_file", &config.storage.bookmarks_file),
        ("storage.categories_file", &config.storage.categories_file),
        ("storage.theme_file", &config.storage.theme_file),
    ];

    for (key, stem) in &stems {
        if stem.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if stem.contains(['/', '\\']) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{stem}` must be a file name, not a path"),
            });
        }
    }

    // Two collections sharing a stem would overwrite each other's files.
    let mut seen = HashSet::new();
    for (key, stem) in &stems[..3] {
        if !seen.insert(stem.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{stem}` is already used by another collection"),
            });
        }
    }

    if config.vault.min_access_code_len < 1 {
        errors.push(ConfigError::Validation {
            message: "vault.min_access_code_len must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &CofferConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&CofferConfig::default()).is_ok());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = CofferConfig::default();
        config.log.level = "verbose".into();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("log.level"));
    }

    #[test]
    fn shared_collection_stem_is_rejected() {
        let mut config = CofferConfig::default();
        config.storage.bookmarks_file = config.storage.passwords_file.clone();
        let msgs = messages(&config);
        assert!(msgs.iter().any(|m| m.contains("storage.bookmarks_file")));
    }

    #[test]
    fn stem_with_separator_is_rejected() {
        let mut config = CofferConfig::default();
        config.storage.passwords_file = "../passwords".into();
        let msgs = messages(&config);
        assert!(msgs[0].contains("must be a file name"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = CofferConfig::default();
        config.storage.data_dir = "  ".into();
        config.vault.min_access_code_len = 0;
        assert_eq!(messages(&config).len(), 2);
    }

    #[test]
    fn parsed_toml_is_validated() {
        let toml_str = r#"
            [vault]
            key_mode = "derived"
            min_access_code_len = 8

            [storage]
            passwords_file = "secrets"
        "#;
        let config: CofferConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.storage.bookmarks_file, "bookmarks");
    }
}
