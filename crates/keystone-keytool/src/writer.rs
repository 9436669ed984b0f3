//! Writes key sets to disk in the layout `FileReader` expects

use crate::KeytoolError;
use keystone_crypto::{encode_web_safe, Crypter, KeyMaterial, KeysetMetadata, METADATA_FILE};
use std::fs;
use std::path::PathBuf;

pub struct KeysetWriter {
    location: PathBuf,
}

impl KeysetWriter {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Create the directory and write initial metadata; refuses to overwrite
    pub fn create(&self, metadata: &KeysetMetadata) -> Result<(), KeytoolError> {
        if self.location.join(METADATA_FILE).exists() {
            return Err(KeytoolError::AlreadyExists(self.location.clone()));
        }
        fs::create_dir_all(&self.location).map_err(|source| KeytoolError::Io {
            path: self.location.clone(),
            source,
        })?;
        self.write_metadata(metadata)
    }

    pub fn write_metadata(&self, metadata: &KeysetMetadata) -> Result<(), KeytoolError> {
        let json = serde_json::to_string_pretty(metadata)
            .map_err(keystone_crypto::CryptoError::from)?;
        self.write(METADATA_FILE, json.as_bytes())
    }

    /// Write one version, encrypted with `crypter` when given
    pub fn write_key(
        &self,
        version: u32,
        material: &KeyMaterial,
        crypter: Option<&Crypter>,
    ) -> Result<(), KeytoolError> {
        let json = serde_json::to_vec(material).map_err(keystone_crypto::CryptoError::from)?;
        let contents = match crypter {
            Some(crypter) => encode_web_safe(&crypter.encrypt(&json)?).into_bytes(),
            None => json,
        };
        self.write(&version.to_string(), &contents)
    }

    pub fn remove_key(&self, version: u32) -> Result<(), KeytoolError> {
        let path = self.location.join(version.to_string());
        fs::remove_file(&path).map_err(|source| KeytoolError::Io { path, source })
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), KeytoolError> {
        let path = self.location.join(name);
        fs::write(&path, contents).map_err(|source| KeytoolError::Io { path, source })
    }
}
