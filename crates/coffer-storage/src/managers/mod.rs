// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One manager per collection. Each persists after every mutation.

pub mod bookmarks;
pub mod categories;
pub mod passwords;

pub use bookmarks::BookmarkManager;
pub use categories::{BUILTIN_CATEGORIES, CategoryManager};
pub use passwords::PasswordManager;
