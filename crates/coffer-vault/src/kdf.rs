// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key derivation from access-code key material.
//!
//! Two strategies exist, selected by [`KeyMode`]:
//! - `Simple`: unsalted SHA-256 of the key material.
//! - `Derived`: PBKDF2-HMAC-SHA256 with 100 000 iterations over a 16-byte
//!   random salt that travels with the envelope.

use std::num::NonZeroU32;

use coffer_core::{CofferError, KeyMode};
use ring::digest::{SHA256, digest};
use ring::pbkdf2::{self, PBKDF2_HMAC_SHA256};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of a PBKDF2 salt in bytes.
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count for `Derived` mode.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// `SHA-256(utf8(key_material))`.
pub fn simple_key(key_material: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let hash = digest(&SHA256, key_material.as_bytes());
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(hash.as_ref());
    key
}

/// Derive a 32-byte key with PBKDF2-HMAC-SHA256.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(key_material: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CofferError> {
    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
        .ok_or_else(|| CofferError::Encryption("PBKDF2 iteration count is zero".to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        key_material.as_bytes(),
        key.as_mut(),
    );
    Ok(key)
}

/// Produce the key for `mode`.
///
/// `salt` is ignored in `Simple` mode. In `Derived` mode an empty salt means
/// the envelope is corrupt.
pub fn key_for(
    mode: KeyMode,
    key_material: &str,
    salt: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>, CofferError> {
    match mode {
        KeyMode::Simple => Ok(simple_key(key_material)),
        KeyMode::Derived if salt.is_empty() => Err(CofferError::Decryption(
            "derived-key envelope has no salt".to_string(),
        )),
        KeyMode::Derived => derive_key(key_material, salt),
    }
}

/// Generate a random 16-byte salt for PBKDF2.
pub fn generate_salt() -> Result<[u8; SALT_LEN], CofferError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| CofferError::Encryption("failed to generate random salt".to_string()))?;
    Ok(salt)
}

/// Lowercase hex SHA-256 of an access code.
///
/// The fingerprint, not the access code itself, is what the vault hands to
/// the stores as key material.
pub fn fingerprint(access_code: &str) -> String {
    hex::encode(digest(&SHA256, access_code.as_bytes()))
}
