// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk encryption envelope.
//!
//! ```json
//! {"salt": "<base64 or empty>", "iv": "<base64>", "data": "<base64>", "use_simple_key": "True"}
//! ```
//!
//! A missing `salt` reads as empty. `use_simple_key` is `"True"` only for
//! Simple mode; anything else (including a missing field) reads as Derived.

use coffer_core::{CofferError, KeyMode};
use serde::{Deserialize, Serialize};

/// The sole content of an encrypted collection file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 PBKDF2 salt; empty in Simple mode.
    #[serde(default)]
    pub salt: String,
    /// Base64 CBC initialization vector.
    pub iv: String,
    /// Base64 ciphertext.
    #[serde(rename = "data")]
    pub ciphertext: String,
    #[serde(rename = "use_simple_key", with = "simple_key_flag", default = "derived")]
    pub mode: KeyMode,
}

fn derived() -> KeyMode {
    KeyMode::Derived
}

impl Envelope {
    /// Pretty-printed envelope JSON as written to `<stem>.enc`.
    pub fn to_json(&self) -> Result<String, CofferError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CofferError::Encryption(format!("failed to serialize envelope: {e}")))
    }

    /// Parse envelope JSON. A malformed envelope is a decryption failure.
    pub fn from_json(json: &str) -> Result<Self, CofferError> {
        serde_json::from_str(json)
            .map_err(|e| CofferError::Decryption(format!("malformed envelope: {e}")))
    }
}

mod simple_key_flag {
    use coffer_core::KeyMode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mode: &KeyMode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match mode {
            KeyMode::Simple => "True",
            KeyMode::Derived => "False",
        })
    }

    // Older files may carry a JSON boolean instead of the string flag.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<KeyMode, D::Error> {
        let flag = serde_json::Value::deserialize(deserializer)?;
        Ok(match flag {
            serde_json::Value::String(s) if s == "True" => KeyMode::Simple,
            serde_json::Value::Bool(true) => KeyMode::Simple,
            _ => KeyMode::Derived,
        })
    }
}
