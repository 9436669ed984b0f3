//! AEAD cipher implementations for Keystone
//!
//! Symmetric key sets and the hybrid/session layers all bottom out here.
//! We support both AES-GCM and ChaCha20-Poly1305.

use crate::encoding::random_bytes;
use crate::CryptoError;
use aes_gcm::{
    aead::{Aead, KeyInit, Nonce, Payload},
    Aes128Gcm, Aes256Gcm,
};
use chacha20poly1305::ChaCha20Poly1305;
use serde::{Deserialize, Serialize};

/// Size of the authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Size of the nonce for AES-GCM
pub const AES_GCM_NONCE_SIZE: usize = 12;

/// Size of the nonce for ChaCha20-Poly1305
pub const CHACHA_NONCE_SIZE: usize = 12;

/// Supported cipher algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CipherAlgorithm {
    /// AES-128-GCM
    #[cfg_attr(feature = "clap", value(name = "aes-gcm"))]
    Aes128Gcm,
    /// AES-256-GCM
    #[cfg_attr(feature = "clap", value(name = "aes-256-gcm"))]
    Aes256Gcm,
    /// ChaCha20-Poly1305
    #[cfg_attr(feature = "clap", value(name = "chacha20-poly1305"))]
    ChaCha20Poly1305,
}

impl CipherAlgorithm {
    /// Get the key size in bytes for this algorithm
    pub fn key_size(&self) -> usize {
        match self {
            CipherAlgorithm::Aes128Gcm => 16,
            CipherAlgorithm::Aes256Gcm => 32,
            CipherAlgorithm::ChaCha20Poly1305 => 32,
        }
    }

    /// Get the nonce size in bytes for this algorithm
    pub fn nonce_size(&self) -> usize {
        match self {
            CipherAlgorithm::Aes128Gcm | CipherAlgorithm::Aes256Gcm => AES_GCM_NONCE_SIZE,
            CipherAlgorithm::ChaCha20Poly1305 => CHACHA_NONCE_SIZE,
        }
    }
}

/// Trait for AEAD cipher operations
pub trait Cipher: Send + Sync {
    /// Encrypt a message with associated data
    fn encrypt(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt a message with associated data
    fn decrypt(&self, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Get the algorithm used by this cipher
    fn algorithm(&self) -> CipherAlgorithm;
}

/// An AEAD cipher backed by one of the RustCrypto implementations.
///
/// All supported algorithms share the `aead` traits, so a single generic
/// wrapper covers them; the algorithm tag only drives size checks.
pub struct AeadCipher<C> {
    cipher: C,
    algorithm: CipherAlgorithm,
}

impl<C: Aead + KeyInit> AeadCipher<C> {
    fn new(algorithm: CipherAlgorithm, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != algorithm.key_size() {
            return Err(CryptoError::InvalidKeyLength {
                expected: algorithm.key_size(),
                got: key.len(),
            });
        }

        let cipher = C::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: algorithm.key_size(),
            got: key.len(),
        })?;

        Ok(Self { cipher, algorithm })
    }

    fn check_nonce(&self, nonce: &[u8]) -> Result<(), CryptoError> {
        let expected = self.algorithm.nonce_size();
        if nonce.len() != expected {
            return Err(CryptoError::InvalidNonceLength {
                expected,
                got: nonce.len(),
            });
        }
        Ok(())
    }
}

impl<C: Aead + KeyInit + Send + Sync> Cipher for AeadCipher<C> {
    fn encrypt(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.check_nonce(nonce)?;
        self.cipher
            .encrypt(
                Nonce::<C>::from_slice(nonce),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::EncryptionFailed)
    }

    fn decrypt(&self, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.check_nonce(nonce)?;
        self.cipher
            .decrypt(
                Nonce::<C>::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }
}

/// Create a cipher instance from an algorithm and key
pub fn create_cipher(
    algorithm: CipherAlgorithm,
    key: &[u8],
) -> Result<Box<dyn Cipher>, CryptoError> {
    match algorithm {
        CipherAlgorithm::Aes128Gcm => Ok(Box::new(AeadCipher::<Aes128Gcm>::new(algorithm, key)?)),
        CipherAlgorithm::Aes256Gcm => Ok(Box::new(AeadCipher::<Aes256Gcm>::new(algorithm, key)?)),
        CipherAlgorithm::ChaCha20Poly1305 => Ok(Box::new(
            AeadCipher::<ChaCha20Poly1305>::new(algorithm, key)?,
        )),
    }
}

/// Encrypt under a fresh random nonce, returning `nonce || ciphertext`.
pub fn seal(cipher: &dyn Cipher, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let nonce = random_bytes(cipher.algorithm().nonce_size())?;
    let ciphertext = cipher.encrypt(&nonce, plaintext, aad)?;

    let mut sealed = Vec::with_capacity(nonce.len() + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Reverse of [`seal`].
pub fn open(cipher: &dyn Cipher, sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let nonce_size = cipher.algorithm().nonce_size();
    if sealed.len() < nonce_size + TAG_SIZE {
        return Err(CryptoError::ShortInput {
            expected: nonce_size + TAG_SIZE,
            got: sealed.len(),
        });
    }

    let (nonce, ciphertext) = sealed.split_at(nonce_size);
    cipher.decrypt(nonce, ciphertext, aad)
}
