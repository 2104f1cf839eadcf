// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Theme settings document (`theme_settings.json`).
//!
//! The document is opaque to the storage engine; it only records which theme
//! the front end last selected.

use std::path::Path;

use coffer_core::CofferError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Theme used when no settings file exists or it cannot be read.
pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    #[serde(default = "default_theme")]
    pub current_theme: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            current_theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl ThemeSettings {
    /// Read the settings file, falling back to the default theme on any error.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read theme settings");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed theme settings -- using default");
                Self::default()
            }
        }
    }

    /// Write the settings file, creating its directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), CofferError> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .map_err(|e| CofferError::storage("failed to create settings directory", e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CofferError::storage("failed to serialize theme settings", e))?;
        std::fs::write(path, json)
            .map_err(|e| CofferError::storage("failed to write theme settings", e))?;
        debug!(path = %path.display(), theme = %self.current_theme, "theme settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_default_theme() {
        let dir = tempdir().unwrap();
        let settings = ThemeSettings::load(&dir.path().join("theme_settings.json"));
        assert_eq!(settings.current_theme, DEFAULT_THEME);
    }

    #[test]
    fn save_then_load_keeps_theme() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/theme_settings.json");
        let settings = ThemeSettings {
            current_theme: "深色主题".into(),
        };
        settings.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"current_theme\""));
        assert!(raw.contains("深色主题"), "non-ASCII must not be escaped: {raw}");
        assert_eq!(ThemeSettings::load(&path), settings);
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("theme_settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(ThemeSettings::load(&path), ThemeSettings::default());
    }
}
