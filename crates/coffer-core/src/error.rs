// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Coffer secrets vault.

use thiserror::Error;

/// The primary error type used across the storage engine and its callers.
///
/// Callers branch on the variant, never on the rendered message.
#[derive(Debug, Error)]
pub enum CofferError {
    /// The access code does not decrypt the stored data.
    ///
    /// Surfaced to the user as "access code incorrect". A load that fails with
    /// this variant never falls back to an empty collection.
    #[error("access code incorrect -- the stored data could not be decrypted")]
    AccessCode,

    /// Encryption failed before any output was produced.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed: wrong key, corrupt envelope or invalid padding.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// File I/O or serialization failure.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A category with this name already exists.
    #[error("category `{name}` already exists")]
    DuplicateName { name: String },

    /// The record is protected and cannot be deleted.
    #[error("category `{name}` is protected and cannot be deleted")]
    ProtectedRecord { name: String },

    /// Malformed input at the API boundary.
    #[error("validation error: {0}")]
    Validation(String),
}

impl CofferError {
    /// Build a [`CofferError::Storage`] from a message and an underlying cause.
    pub fn storage(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// True when the error means the supplied access code is wrong.
    pub fn is_access_code(&self) -> bool {
        matches!(self, Self::AccessCode)
    }
}
