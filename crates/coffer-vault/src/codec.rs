// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Envelope encryption of byte payloads and JSON values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use coffer_core::{CofferError, KeyMode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::crypto::{decrypt_cbc, encrypt_cbc, generate_iv};
use crate::envelope::Envelope;
use crate::kdf::{generate_salt, key_for};

/// Encrypt `plaintext` under `key_material` into a fresh envelope.
///
/// Derived mode draws a new salt; both modes draw a new IV.
pub fn encrypt(plaintext: &[u8], key_material: &str, mode: KeyMode) -> Result<Envelope, CofferError> {
    let salt = match mode {
        KeyMode::Simple => Vec::new(),
        KeyMode::Derived => generate_salt()?.to_vec(),
    };
    let key = key_for(mode, key_material, &salt)
        .map_err(|e| CofferError::Encryption(format!("key derivation failed: {e}")))?;
    let iv = generate_iv()?;
    let ciphertext = encrypt_cbc(&key, &iv, plaintext)?;

    Ok(Envelope {
        salt: STANDARD.encode(&salt),
        iv: STANDARD.encode(iv),
        ciphertext: STANDARD.encode(ciphertext),
        mode,
    })
}

/// Decrypt an envelope, re-deriving the key with the envelope's own mode.
pub fn decrypt(envelope: &Envelope, key_material: &str) -> Result<Vec<u8>, CofferError> {
    let salt = decode_field("salt", &envelope.salt)?;
    let iv = decode_field("iv", &envelope.iv)?;
    let ciphertext = decode_field("data", &envelope.ciphertext)?;

    let key = key_for(envelope.mode, key_material, &salt)?;
    decrypt_cbc(&key, &iv, &ciphertext)
}

/// Serialize `value` as pretty UTF-8 JSON and encrypt it.
pub fn encrypt_json<T: Serialize + ?Sized>(
    value: &T,
    key_material: &str,
    mode: KeyMode,
) -> Result<Envelope, CofferError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| CofferError::Encryption(format!("failed to serialize payload: {e}")))?;
    encrypt(&json, key_material, mode)
}

/// Decrypt an envelope and parse its payload as JSON.
///
/// Invalid UTF-8 or invalid JSON after decryption is a decryption failure:
/// a wrong key that happens to yield valid padding ends up here.
pub fn decrypt_json<T: DeserializeOwned>(
    envelope: &Envelope,
    key_material: &str,
) -> Result<T, CofferError> {
    let bytes = decrypt(envelope, key_material)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| CofferError::Decryption(format!("payload is not UTF-8: {e}")))?;
    serde_json::from_str(text)
        .map_err(|e| CofferError::Decryption(format!("payload is not valid JSON: {e}")))
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, CofferError> {
    STANDARD
        .decode(value)
        .map_err(|e| CofferError::Decryption(format!("invalid base64 in `{name}`: {e}")))
}
