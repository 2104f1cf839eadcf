// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-CBC encrypt/decrypt with PKCS#7-style padding.
//!
//! Every envelope gets a fresh random 128-bit IV from the system CSPRNG.
//! Padding is applied and checked here so that a bad pad byte surfaces as
//! `invalid padding` rather than an opaque cipher error.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding};
use coffer_core::CofferError;
use ring::rand::{SecureRandom, SystemRandom};

use crate::kdf::KEY_LEN;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// Generate a random 16-byte IV.
pub fn generate_iv() -> Result<[u8; IV_LEN], CofferError> {
    let rng = SystemRandom::new();
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv)
        .map_err(|_| CofferError::Encryption("failed to generate random IV".to_string()))?;
    Ok(iv)
}

/// Append `n` bytes of value `n`, `n` in 1..=16. Aligned input gains a full block.
pub fn pad(plaintext: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_LEN - plaintext.len() % BLOCK_LEN;
    let mut padded = Vec::with_capacity(plaintext.len() + pad_len);
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + pad_len, pad_len as u8);
    padded
}

/// Strip the padding added by [`pad`].
///
/// Only the last byte is inspected: it must be in 1..=16 and no longer than
/// the buffer.
pub fn unpad(padded: &[u8]) -> Result<&[u8], CofferError> {
    let Some(&last) = padded.last() else {
        return Err(CofferError::Decryption("invalid padding".to_string()));
    };
    let pad_len = last as usize;
    if pad_len == 0 || pad_len > BLOCK_LEN || pad_len > padded.len() {
        return Err(CofferError::Decryption("invalid padding".to_string()));
    }
    Ok(&padded[..padded.len() - pad_len])
}

/// Pad and encrypt `plaintext` with AES-256-CBC.
pub fn encrypt_cbc(
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CofferError> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| CofferError::Encryption(format!("failed to create AES-256-CBC cipher: {e}")))?;

    let mut buf = pad(plaintext);
    let len = buf.len();
    cipher
        .encrypt_padded_mut::<NoPadding>(&mut buf, len)
        .map_err(|e| CofferError::Encryption(format!("AES-256-CBC encryption failed: {e}")))?;
    Ok(buf)
}

/// Decrypt AES-256-CBC `ciphertext` and strip its padding.
///
/// The ciphertext must be a non-empty multiple of the block size.
pub fn decrypt_cbc(
    key: &[u8; KEY_LEN],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CofferError> {
    if iv.len() != IV_LEN {
        return Err(CofferError::Decryption(format!(
            "IV must be {IV_LEN} bytes, got {}",
            iv.len()
        )));
    }
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CofferError::Decryption(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            ciphertext.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| CofferError::Decryption(format!("failed to create AES-256-CBC cipher: {e}")))?;

    let mut buf = ciphertext.to_vec();
    let decrypted = cipher
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|e| CofferError::Decryption(format!("AES-256-CBC decryption failed: {e}")))?;

    Ok(unpad(decrypted)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];

    #[test]
    fn pad_unaligned_input() {
        let padded = pad(b"hello");
        assert_eq!(padded.len(), 16);
        assert!(padded[5..].iter().all(|&b| b == 11));
    }

    #[test]
    fn pad_aligned_input_gains_full_block() {
        let padded = pad(&[0u8; 32]);
        assert_eq!(padded.len(), 48);
        assert!(padded[32..].iter().all(|&b| b == 16));
    }

    #[test]
    fn pad_empty_input() {
        assert_eq!(pad(b""), vec![16u8; 16]);
    }

    #[test]
    fn unpad_rejects_zero_and_oversized_pad() {
        let mut block = [0u8; 16];
        assert!(matches!(unpad(&block), Err(CofferError::Decryption(m)) if m == "invalid padding"));
        block[15] = 17;
        assert!(unpad(&block).is_err());
        assert!(unpad(&[5u8, 5, 5]).is_err());
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let iv = generate_iv().unwrap();
        let ciphertext = encrypt_cbc(&KEY, &iv, b"secret payload").unwrap();
        assert_eq!(ciphertext.len(), 16);
        assert_eq!(decrypt_cbc(&KEY, &iv, &ciphertext).unwrap(), b"secret payload");
    }

    #[test]
    fn generate_iv_produces_random_values() {
        assert_ne!(generate_iv().unwrap(), generate_iv().unwrap());
    }

    #[test]
    fn decrypt_rejects_bad_lengths() {
        let iv = [0u8; IV_LEN];
        assert!(decrypt_cbc(&KEY, &iv, &[]).is_err());
        assert!(decrypt_cbc(&KEY, &iv, &[0u8; 15]).is_err());
        assert!(decrypt_cbc(&KEY, &iv[..8], &[0u8; 16]).is_err());
    }

    #[test]
    fn wrong_key_does_not_return_plaintext() {
        let iv = generate_iv().unwrap();
        let ciphertext = encrypt_cbc(&KEY, &iv, b"do not leak this").unwrap();
        let other = [0x24u8; KEY_LEN];
        match decrypt_cbc(&other, &iv, &ciphertext) {
            Ok(bytes) => assert_ne!(bytes, b"do not leak this"),
            Err(e) => assert!(matches!(e, CofferError::Decryption(_))),
        }
    }
}
