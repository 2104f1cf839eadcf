// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record model shared by the storage engine and its callers.
//!
//! Records deserialize explicitly into typed structs; any field missing on
//! disk takes its documented default instead of failing the whole load.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Local, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Name of the category that always exists and can never be deleted.
pub const DEFAULT_CATEGORY: &str = "default";

/// Color given to categories that do not specify one.
pub const DEFAULT_COLOR: &str = "#007acc";

/// Key-derivation strategy recorded in every encryption envelope.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KeyMode {
    /// Unsalted SHA-256 of the key material.
    #[default]
    Simple,
    /// PBKDF2-HMAC-SHA256 with a fresh random salt per encryption.
    Derived,
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Allocate a record id: the current Unix time in milliseconds, bumped so
/// that ids handed out by this process are strictly increasing.
pub fn new_record_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Current local time as an ISO-8601 string with microseconds.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A record that can live in a persisted collection.
pub trait Record: Clone + std::fmt::Debug + Serialize + DeserializeOwned {
    /// Human-readable kind used in log output.
    const KIND: &'static str;

    /// Stable unique id.
    fn id(&self) -> &str;

    /// Text fields consulted by `search`.
    fn search_fields(&self) -> Vec<&str>;

    /// Refresh `updated_time`.
    fn touch(&mut self);

    /// Case-insensitive substring match over [`Record::search_fields`].
    ///
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A stored credential. `Debug` output redacts the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    #[serde(default = "new_record_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "now_timestamp")]
    pub created_time: String,
    #[serde(default = "now_timestamp")]
    pub updated_time: String,
}

impl PasswordRecord {
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        description: impl Into<String>,
        account: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let now = now_timestamp();
        Self {
            id: new_record_id(),
            title: title.into(),
            source: source.into(),
            description: description.into(),
            account: account.into(),
            password: password.into(),
            created_time: now.clone(),
            updated_time: now,
        }
    }

    /// Apply the fields present in `patch` and refresh `updated_time`.
    pub fn apply(&mut self, patch: PasswordPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(account) = patch.account {
            self.account = account;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        self.touch();
    }
}

impl std::fmt::Debug for PasswordRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordRecord")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("source", &self.source)
            .field("account", &self.account)
            .field("password", &"[REDACTED]")
            .field("updated_time", &self.updated_time)
            .finish_non_exhaustive()
    }
}

impl Record for PasswordRecord {
    const KIND: &'static str = "password";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.source, &self.description, &self.account]
    }

    fn touch(&mut self) {
        self.updated_time = now_timestamp();
    }
}

/// Partial update for a [`PasswordRecord`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordPatch {
    pub title: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub account: Option<String>,
    pub password: Option<String>,
}

/// A saved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    #[serde(default = "new_record_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "now_timestamp")]
    pub created_time: String,
    #[serde(default = "now_timestamp")]
    pub updated_time: String,
}

impl BookmarkRecord {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let now = now_timestamp();
        Self {
            id: new_record_id(),
            title: title.into(),
            url: url.into(),
            description: description.into(),
            category: category.into(),
            created_time: now.clone(),
            updated_time: now,
        }
    }

    pub fn apply(&mut self, patch: BookmarkPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.touch();
    }
}

impl Record for BookmarkRecord {
    const KIND: &'static str = "bookmark";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.url, &self.description, &self.category]
    }

    fn touch(&mut self) {
        self.updated_time = now_timestamp();
    }
}

/// Partial update for a [`BookmarkRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// A bookmark category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(default = "new_record_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "now_timestamp")]
    pub created_time: String,
    #[serde(default = "now_timestamp")]
    pub updated_time: String,
}

impl CategoryRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        let now = now_timestamp();
        Self {
            id: new_record_id(),
            name: name.into(),
            description: description.into(),
            color: color.into(),
            created_time: now.clone(),
            updated_time: now,
        }
    }

    /// True for the category that can never be deleted.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_CATEGORY
    }

    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        self.touch();
    }
}

impl Record for CategoryRecord {
    const KIND: &'static str = "category";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }

    fn touch(&mut self) {
        self.updated_time = now_timestamp();
    }
}

/// Partial update for a [`CategoryRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}
