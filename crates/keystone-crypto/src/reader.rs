//! Sources of key set data

use crate::crypt::Crypter;
use crate::encoding::decode_web_safe;
use crate::CryptoError;
use std::fs;
use std::path::PathBuf;

/// Name of the metadata file inside a key set directory
pub const METADATA_FILE: &str = "meta";

/// Supplies the raw JSON of a key set
pub trait KeyReader {
    /// The `meta` document
    fn metadata(&self) -> Result<String, CryptoError>;

    /// The key document for one version
    fn key(&self, version: u32) -> Result<String, CryptoError>;
}

impl<R: KeyReader + ?Sized> KeyReader for Box<R> {
    fn metadata(&self) -> Result<String, CryptoError> {
        (**self).metadata()
    }

    fn key(&self, version: u32) -> Result<String, CryptoError> {
        (**self).key(version)
    }
}

/// Reads a key set laid out as `<location>/meta` and `<location>/<version>`
#[derive(Debug, Clone)]
pub struct FileReader {
    location: PathBuf,
}

impl FileReader {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    fn read(&self, name: &str) -> Result<String, CryptoError> {
        let path = self.location.join(name);
        fs::read_to_string(&path).map_err(|source| CryptoError::KeysetIo { path, source })
    }
}

impl KeyReader for FileReader {
    fn metadata(&self) -> Result<String, CryptoError> {
        self.read(METADATA_FILE)
    }

    fn key(&self, version: u32) -> Result<String, CryptoError> {
        self.read(&version.to_string())
    }
}

/// Decrypts every key document of an inner reader with a wrapping crypter.
///
/// The metadata is stored in the clear and passes through unchanged.
pub struct EncryptedReader<R> {
    inner: R,
    crypter: Crypter,
}

impl<R: KeyReader> EncryptedReader<R> {
    pub fn new(inner: R, crypter: Crypter) -> Self {
        Self { inner, crypter }
    }
}

impl<R: KeyReader> KeyReader for EncryptedReader<R> {
    fn metadata(&self) -> Result<String, CryptoError> {
        self.inner.metadata()
    }

    fn key(&self, version: u32) -> Result<String, CryptoError> {
        let ciphertext = decode_web_safe(&self.inner.key(version)?)?;
        let plaintext = self.crypter.decrypt(&ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Malformed(format!("key {version} is not UTF-8")))
    }
}
