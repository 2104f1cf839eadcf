// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the envelope codec.

use coffer_core::{CofferError, KeyMode};
use coffer_vault::{Envelope, decrypt, decrypt_json, encrypt, encrypt_json, fingerprint};
use proptest::prelude::*;

proptest! {
    #[test]
    fn simple_mode_roundtrips_any_payload(
        payload in proptest::collection::vec(any::<u8>(), 0..512),
        material in "\\PC{1,40}",
    ) {
        let envelope = encrypt(&payload, &material, KeyMode::Simple).unwrap();
        prop_assert_eq!(decrypt(&envelope, &material).unwrap(), payload);
    }
}

#[test]
fn derived_mode_roundtrips_through_envelope_json() {
    let material = fingerprint("4321");
    let records = serde_json::json!([
        {"id": "1", "title": "Gmail", "account": "me@example.com", "password": "p@ss"}
    ]);

    let envelope = encrypt_json(&records, &material, KeyMode::Derived).unwrap();
    let json = envelope.to_json().unwrap();
    let parsed = Envelope::from_json(&json).unwrap();
    assert_eq!(parsed.mode, KeyMode::Derived);

    let back: serde_json::Value = decrypt_json(&parsed, &material).unwrap();
    assert_eq!(back, records);
}

#[test]
fn wrong_key_fails_loudly() {
    let records = serde_json::json!([{"title": "Gmail"}]);
    for mode in [KeyMode::Simple, KeyMode::Derived] {
        let envelope = encrypt_json(&records, &fingerprint("right"), mode).unwrap();
        let result: Result<serde_json::Value, CofferError> =
            decrypt_json(&envelope, &fingerprint("wrong"));
        assert!(
            matches!(result, Err(CofferError::Decryption(_))),
            "mode {mode} must reject the wrong key"
        );
    }
}

#[test]
fn every_encryption_uses_a_fresh_iv() {
    let a = encrypt(b"same plaintext", "material", KeyMode::Simple).unwrap();
    let b = encrypt(b"same plaintext", "material", KeyMode::Simple).unwrap();
    assert_ne!(a.iv, b.iv);
    assert_ne!(a.ciphertext, b.ciphertext);

    let c = encrypt(b"same plaintext", "material", KeyMode::Derived).unwrap();
    let d = encrypt(b"same plaintext", "material", KeyMode::Derived).unwrap();
    assert_ne!(c.salt, d.salt);
}

#[test]
fn block_aligned_payload_gains_a_full_padding_block() {
    use base64::Engine;
    let envelope = encrypt(&[b'x'; 32], "material", KeyMode::Simple).unwrap();
    let ciphertext = base64::engine::general_purpose::STANDARD
        .decode(&envelope.ciphertext)
        .unwrap();
    assert_eq!(ciphertext.len(), 48);
    assert_eq!(decrypt(&envelope, "material").unwrap(), vec![b'x'; 32]);
}

#[test]
fn truncated_ciphertext_is_a_decryption_error() {
    use base64::Engine;
    let engine = base64::engine::general_purpose::STANDARD;
    let mut envelope = encrypt(&[7u8; 40], "material", KeyMode::Simple).unwrap();
    let mut ciphertext = engine.decode(&envelope.ciphertext).unwrap();
    ciphertext.truncate(ciphertext.len() - 3);
    envelope.ciphertext = engine.encode(ciphertext);

    assert!(matches!(
        decrypt(&envelope, "material"),
        Err(CofferError::Decryption(_))
    ));
}
