// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted collection storage for the Coffer secrets vault.
//!
//! Each collection (passwords, bookmarks, bookmark categories) is a JSON
//! array on disk, either as `<stem>.json` or as an encrypted `<stem>.enc`
//! envelope. [`CollectionStore`] keeps exactly one of the two authoritative
//! and migrates plaintext to ciphertext on load. The managers add
//! write-through mutation on top, and [`Coffer`] ties the three together
//! under one access code.

pub mod coffer;
pub mod collection;
pub mod managers;
mod migration;
mod rekey;
pub mod store;

pub use coffer::{Coffer, CofferOptions, LoadReport, VaultPaths, validate_access_code};
pub use collection::Collection;
pub use managers::{BookmarkManager, CategoryManager, PasswordManager};
pub use store::{CollectionPaths, CollectionStore, LoadOutcome, Loaded, StoreConfig};
