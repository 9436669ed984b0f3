//! Opening key sets for a single role

use crate::error::InteropError;
use keystone_crypto::{
    Crypter, CryptoError, EncryptedReader, Encrypter, FileReader, KeyReader, KeyRole, Keyset,
    Signer, UnversionedSigner, UnversionedVerifier, Verifier,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A capability that can be built from a loaded key set
pub trait Role: Sized {
    const ROLE: KeyRole;

    fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError>;
}

macro_rules! impl_role {
    ($($ty:ident => $role:ident),* $(,)?) => {
        $(
            impl Role for $ty {
                const ROLE: KeyRole = KeyRole::$role;

                fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError> {
                    $ty::from_keyset(keyset)
                }
            }
        )*
    };
}

impl_role! {
    Signer => Signer,
    Verifier => Verifier,
    UnversionedSigner => UnversionedSigner,
    UnversionedVerifier => UnversionedVerifier,
    Encrypter => Encrypter,
    Crypter => Crypter,
}

/// Key sets living under one directory
#[derive(Debug, Clone)]
pub struct KeyAccess {
    root: PathBuf,
}

impl KeyAccess {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/<algorithm><crypted><pub_key>`
    pub fn keyset_path(&self, algorithm: &str, crypted: &str, pub_key: &str) -> PathBuf {
        self.root.join(format!("{algorithm}{crypted}{pub_key}"))
    }

    /// Open the key set for `algorithm`, decrypting it with the `crypted`
    /// key set when that name is non-empty
    pub fn open_for<R: Role>(
        &self,
        algorithm: &str,
        crypted: &str,
        pub_key: &str,
    ) -> Result<R, InteropError> {
        let path = self.keyset_path(algorithm, crypted, pub_key);
        if crypted.is_empty() {
            self.open(&path)
        } else {
            self.open_encrypted(&path, &self.root.join(crypted))
        }
    }

    pub fn open<R: Role>(&self, path: &Path) -> Result<R, InteropError> {
        load(path, &FileReader::new(path))
    }

    /// Open a key set whose keys are encrypted by the crypter at `wrapping_path`
    pub fn open_encrypted<R: Role>(
        &self,
        path: &Path,
        wrapping_path: &Path,
    ) -> Result<R, InteropError> {
        let wrapping: Crypter = load(wrapping_path, &FileReader::new(wrapping_path))?;
        load(path, &EncryptedReader::new(FileReader::new(path), wrapping))
    }
}

fn load<R: Role>(path: &Path, reader: &dyn KeyReader) -> Result<R, InteropError> {
    let access_error = |source| InteropError::KeyAccess {
        path: path.to_path_buf(),
        source,
    };
    let keyset = Keyset::read(reader).map_err(access_error)?;
    let role = R::from_keyset(&keyset).map_err(access_error)?;
    debug!(path = %path.display(), role = ?R::ROLE, "opened key set");
    Ok(role)
}
