//! Encryption roles

use crate::format::{header, split_header, KeyHash};
use crate::keys::{DecryptingKey, EncryptingKey};
use crate::keyset::{KeyRole, Keyset};
use crate::reader::KeyReader;
use crate::CryptoError;
use tracing::debug;

/// Produces ciphertexts with the primary key.
///
/// Built from an asymmetric private key set it only keeps the public half.
pub struct Encrypter {
    hash: KeyHash,
    key: EncryptingKey,
}

impl Encrypter {
    pub fn read(reader: &dyn KeyReader) -> Result<Self, CryptoError> {
        Self::from_keyset(&Keyset::read(reader)?)
    }

    pub fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError> {
        keyset.require_role(KeyRole::Encrypter)?;
        let primary = keyset.primary_key()?;
        Ok(Self {
            hash: primary.hash()?,
            key: primary.encrypting_key()?,
        })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.key.encrypt(&header(&self.hash), plaintext)
    }
}

/// Encrypts with the primary key and decrypts with any version
pub struct Crypter {
    primary: Encrypter,
    keys: Vec<(KeyHash, DecryptingKey)>,
}

impl Crypter {
    pub fn read(reader: &dyn KeyReader) -> Result<Self, CryptoError> {
        Self::from_keyset(&Keyset::read(reader)?)
    }

    pub fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError> {
        keyset.require_role(KeyRole::Crypter)?;

        let keys = keyset
            .keys()
            .map(|(_, material)| Ok((material.hash()?, material.decrypting_key()?)))
            .collect::<Result<Vec<_>, CryptoError>>()?;

        let primary = keyset.primary_key()?;
        let primary_hash = primary.hash()?;
        let primary_key = primary.decrypting_key()?.encrypting_key();

        Ok(Self {
            primary: Encrypter {
                hash: primary_hash,
                key: primary_key,
            },
            keys,
        })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.primary.encrypt(plaintext)
    }

    /// Decrypt with whichever version the header names.
    ///
    /// Versions sharing a truncated hash are each tried in turn.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (hash, _) = split_header(ciphertext)?;

        let mut found = false;
        for (_, key) in self.keys.iter().filter(|(h, _)| *h == hash) {
            found = true;
            match key.decrypt(ciphertext) {
                Ok(plaintext) => return Ok(plaintext),
                Err(e) => debug!("candidate key rejected ciphertext: {e}"),
            }
        }

        if found {
            Err(CryptoError::DecryptionFailed)
        } else {
            Err(CryptoError::KeyNotFound(hash))
        }
    }
}
