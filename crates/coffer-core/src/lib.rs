// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Coffer secrets vault.
//!
//! Holds the error taxonomy and the record model shared by the codec, the
//! storage engine and the command line front end.

pub mod error;
pub mod types;

pub use error::CofferError;
pub use types::{
    BookmarkPatch, BookmarkRecord, CategoryPatch, CategoryRecord, KeyMode, PasswordPatch,
    PasswordRecord, Record, DEFAULT_CATEGORY, DEFAULT_COLOR,
};
