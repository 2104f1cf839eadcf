// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Coffer secrets vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::{Path, PathBuf};

use coffer_core::KeyMode;
use serde::{Deserialize, Serialize};

/// Top-level Coffer configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CofferConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Data file locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Encryption settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Where the collection files live.
///
/// Each collection is stored as `<data_dir>/<stem>.json` in plaintext mode and
/// `<data_dir>/<stem>.enc` once encrypted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding all collection and settings files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File stem of the password collection.
    #[serde(default = "default_passwords_file")]
    pub passwords_file: String,

    /// File stem of the bookmark collection.
    #[serde(default = "default_bookmarks_file")]
    pub bookmarks_file: String,

    /// File stem of the bookmark-category collection.
    #[serde(default = "default_categories_file")]
    pub categories_file: String,

    /// File name of the theme settings document.
    #[serde(default = "default_theme_file")]
    pub theme_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            passwords_file: default_passwords_file(),
            bookmarks_file: default_bookmarks_file(),
            categories_file: default_categories_file(),
            theme_file: default_theme_file(),
        }
    }
}

impl StorageConfig {
    pub fn data_dir(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn theme_path(&self) -> PathBuf {
        self.data_dir().join(&self.theme_file)
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|d| d.join("coffer").display().to_string())
        .unwrap_or_else(|| "config".to_string())
}

fn default_passwords_file() -> String {
    "passwords".to_string()
}

fn default_bookmarks_file() -> String {
    "bookmarks".to_string()
}

fn default_categories_file() -> String {
    "bookmark_categories".to_string()
}

fn default_theme_file() -> String {
    "theme_settings.json".to_string()
}

/// Encryption configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Encrypt collections at rest. Plaintext files are migrated on first load.
    #[serde(default = "default_encrypt")]
    pub encrypt: bool,

    /// Key-derivation strategy for newly written envelopes.
    #[serde(default)]
    pub key_mode: KeyMode,

    /// Minimum accepted access code length in characters.
    #[serde(default = "default_min_access_code_len")]
    pub min_access_code_len: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            encrypt: default_encrypt(),
            key_mode: KeyMode::default(),
            min_access_code_len: default_min_access_code_len(),
        }
    }
}

fn default_encrypt() -> bool {
    true
}

fn default_min_access_code_len() -> usize {
    4
}
