mod common;

use common::keyset;
use keystone_crypto::{
    encode_web_safe, CryptoError, Crypter, EncryptedReader, FileReader, KeyKind, KeyPurpose,
    Keyset, Signer, Verifier, METADATA_FILE,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_plain(dir: &Path, keys: &Keyset) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(METADATA_FILE),
        serde_json::to_string(keys.metadata()).unwrap(),
    )
    .unwrap();
    for (version, material) in keys.keys() {
        fs::write(
            dir.join(version.to_string()),
            serde_json::to_string(material).unwrap(),
        )
        .unwrap();
    }
}

fn write_encrypted(dir: &Path, keys: &Keyset, wrapping: &Crypter) {
    fs::create_dir_all(dir).unwrap();
    let mut metadata = keys.metadata().clone();
    metadata.encrypted = true;
    fs::write(
        dir.join(METADATA_FILE),
        serde_json::to_string(&metadata).unwrap(),
    )
    .unwrap();
    for (version, material) in keys.keys() {
        let json = serde_json::to_vec(material).unwrap();
        let ciphertext = wrapping.encrypt(&json).unwrap();
        fs::write(dir.join(version.to_string()), encode_web_safe(&ciphertext)).unwrap();
    }
}

#[test]
fn file_reader_loads_what_was_written() {
    let temp = TempDir::new().unwrap();
    let keys = keyset(KeyPurpose::SignAndVerify, KeyKind::Ed25519Priv);
    write_plain(&temp.path().join("dsa"), &keys);

    let loaded = Keyset::read(&FileReader::new(temp.path().join("dsa"))).unwrap();
    assert_eq!(loaded.metadata(), keys.metadata());
    assert_eq!(loaded.primary_key().unwrap(), keys.primary_key().unwrap());

    let signature = Signer::from_keyset(&keys).unwrap().sign(b"hello").unwrap();
    let verifier = Verifier::read(&FileReader::new(temp.path().join("dsa"))).unwrap();
    assert!(verifier.verify(b"hello", &signature).unwrap());
}

#[test]
fn missing_key_set_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let result = Keyset::read(&FileReader::new(temp.path().join("absent")));
    match result {
        Err(CryptoError::KeysetIo { path, .. }) => assert!(path.ends_with("absent/meta")),
        other => panic!("expected KeysetIo, got {other:?}"),
    }
}

#[test]
fn encrypted_reader_unwraps_keys() {
    let temp = TempDir::new().unwrap();
    let wrapping_keys = keyset(KeyPurpose::DecryptAndEncrypt, KeyKind::Aead);
    let wrapping = Crypter::from_keyset(&wrapping_keys).unwrap();
    let keys = keyset(KeyPurpose::SignAndVerify, KeyKind::HmacSha256);
    write_encrypted(&temp.path().join("hmacaes"), &keys, &wrapping);

    let raw = fs::read_to_string(temp.path().join("hmacaes").join("1")).unwrap();
    assert!(!raw.contains("HMAC_SHA256"), "key must not be stored in the clear");

    let reader = EncryptedReader::new(FileReader::new(temp.path().join("hmacaes")), wrapping);
    let loaded = Keyset::read(&reader).unwrap();
    assert_eq!(loaded.primary_key().unwrap(), keys.primary_key().unwrap());
}

#[test]
fn encrypted_key_set_without_wrapper_is_refused() {
    let temp = TempDir::new().unwrap();
    let wrapping =
        Crypter::from_keyset(&keyset(KeyPurpose::DecryptAndEncrypt, KeyKind::Aead)).unwrap();
    let keys = keyset(KeyPurpose::SignAndVerify, KeyKind::HmacSha256);
    write_encrypted(&temp.path().join("hmacaes"), &keys, &wrapping);

    assert!(matches!(
        Keyset::read(&FileReader::new(temp.path().join("hmacaes"))),
        Err(CryptoError::EncryptedKeyset)
    ));
}

#[test]
fn wrong_wrapping_key_fails() {
    let temp = TempDir::new().unwrap();
    let wrapping =
        Crypter::from_keyset(&keyset(KeyPurpose::DecryptAndEncrypt, KeyKind::Aead)).unwrap();
    let other =
        Crypter::from_keyset(&keyset(KeyPurpose::DecryptAndEncrypt, KeyKind::Aead)).unwrap();
    let keys = keyset(KeyPurpose::SignAndVerify, KeyKind::HmacSha256);
    write_encrypted(&temp.path().join("hmacaes"), &keys, &wrapping);

    let reader = EncryptedReader::new(FileReader::new(temp.path().join("hmacaes")), other);
    assert!(matches!(
        Keyset::read(&reader),
        Err(CryptoError::KeyNotFound(_))
    ));
}

#[test]
fn mismatched_key_kind_is_malformed() {
    let temp = TempDir::new().unwrap();
    let keys = keyset(KeyPurpose::SignAndVerify, KeyKind::HmacSha256);
    write_plain(&temp.path().join("k"), &keys);

    let other = keyset(KeyPurpose::SignAndVerify, KeyKind::Ed25519Priv);
    fs::write(
        temp.path().join("k").join("1"),
        serde_json::to_string(other.primary_key().unwrap()).unwrap(),
    )
    .unwrap();

    assert!(matches!(
        Keyset::read(&FileReader::new(temp.path().join("k"))),
        Err(CryptoError::Malformed(_))
    ));
}
