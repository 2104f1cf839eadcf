// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key derivation and envelope encryption for the Coffer secrets vault.
//!
//! Collections are encrypted with AES-256-CBC under a key obtained from the
//! caller's key material, either by a plain SHA-256 (`Simple`) or by
//! PBKDF2-HMAC-SHA256 with a per-envelope salt (`Derived`). The result is an
//! [`Envelope`] that is written to disk as JSON.

pub mod codec;
pub mod crypto;
pub mod envelope;
pub mod kdf;
pub mod mask;
pub mod prompt;

pub use codec::{decrypt, decrypt_json, encrypt, encrypt_json};
pub use envelope::Envelope;
pub use kdf::fingerprint;
pub use mask::mask_secret;
pub use prompt::{get_access_code, get_access_code_with_confirm};
