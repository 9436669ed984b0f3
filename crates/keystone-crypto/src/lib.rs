//! Cryptographic toolkit for Keystone
//!
//! Versioned key sets with role-scoped access: signers and verifiers,
//! encrypters and crypters, plus signed sessions built on top of them.
//! We use ring for signatures, HMAC and HKDF, RustCrypto AEADs for bulk
//! encryption and x25519-dalek for hybrid encryption keys.

pub mod cipher;
pub mod crypt;
pub mod encoding;
pub mod format;
pub mod keys;
pub mod keyset;
pub mod reader;
pub mod session;
pub mod sign;

pub use cipher::{
    create_cipher, Cipher, CipherAlgorithm, AES_GCM_NONCE_SIZE, CHACHA_NONCE_SIZE, TAG_SIZE,
};
pub use crypt::{Crypter, Encrypter};
pub use encoding::{decode_web_safe, derive_key, encode_web_safe, random_bytes};
pub use format::{KeyHash, FORMAT_VERSION, HEADER_SIZE, KEY_HASH_SIZE};
pub use keys::{KeyKind, KeyMaterial};
pub use keyset::{KeyPurpose, KeyRole, KeyStatus, KeyVersion, Keyset, KeysetMetadata};
pub use reader::{EncryptedReader, FileReader, KeyReader, METADATA_FILE};
pub use session::{SignedSessionDecrypter, SignedSessionEncrypter, SESSION_NONCE_SIZE};
pub use sign::{Signer, UnversionedSigner, UnversionedVerifier, Verifier};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid nonce length: expected {expected}, got {got}")]
    InvalidNonceLength { expected: usize, got: usize },

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Signing failed")]
    SigningFailed,

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Input too short: expected at least {expected} bytes, got {got}")]
    ShortInput { expected: usize, got: usize },

    #[error("Unsupported format version {0}")]
    BadVersion(u8),

    #[error("No key matches hash {0:02x?}")]
    KeyNotFound(KeyHash),

    #[error("Key set has no primary key")]
    NoPrimaryKey,

    #[error("Key set has no version {0}")]
    NoSuchVersion(u32),

    #[error("Cannot change status of version {version}: {reason}")]
    InvalidStatusChange { version: u32, reason: &'static str },

    #[error("{role:?} cannot use a key set with purpose {purpose:?}")]
    UnacceptablePurpose { role: KeyRole, purpose: KeyPurpose },

    #[error("{kind:?} keys cannot be used for {purpose:?}")]
    UnsupportedPurpose { kind: KeyKind, purpose: KeyPurpose },

    #[error("Expected {expected}, got {got:?}")]
    WrongKeyKind { expected: &'static str, got: KeyKind },

    #[error("Key set is encrypted; open it through an EncryptedReader")]
    EncryptedKeyset,

    #[error("Malformed key data: {0}")]
    Malformed(String),

    #[error("Cannot read {}: {source}", path.display())]
    KeysetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
