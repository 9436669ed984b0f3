//! Key sets: versioned key material plus the metadata describing it

use crate::keys::{KeyKind, KeyMaterial};
use crate::reader::KeyReader;
use crate::CryptoError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// What a key set may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyPurpose {
    DecryptAndEncrypt,
    Encrypt,
    SignAndVerify,
    Verify,
}

/// Lifecycle status of one key version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyStatus {
    /// Used to produce new artifacts; at most one per key set
    Primary,
    /// Accepted when consuming artifacts
    Active,
    /// Still accepted, scheduled for revocation
    Inactive,
}

/// Access level requested from a key set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Signer,
    Verifier,
    UnversionedSigner,
    UnversionedVerifier,
    Encrypter,
    Crypter,
}

impl KeyRole {
    /// Whether a key set with `purpose` can back this role
    pub fn accepts(&self, purpose: KeyPurpose) -> bool {
        match self {
            KeyRole::Signer | KeyRole::UnversionedSigner => purpose == KeyPurpose::SignAndVerify,
            KeyRole::Verifier | KeyRole::UnversionedVerifier => {
                matches!(purpose, KeyPurpose::SignAndVerify | KeyPurpose::Verify)
            }
            KeyRole::Crypter => purpose == KeyPurpose::DecryptAndEncrypt,
            KeyRole::Encrypter => {
                matches!(purpose, KeyPurpose::DecryptAndEncrypt | KeyPurpose::Encrypt)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVersion {
    pub version_number: u32,
    pub status: KeyStatus,
}

/// Contents of a key set's `meta` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysetMetadata {
    #[serde(default)]
    pub name: String,
    pub purpose: KeyPurpose,
    pub kind: KeyKind,
    #[serde(default)]
    pub versions: Vec<KeyVersion>,
    #[serde(default)]
    pub encrypted: bool,
}

impl KeysetMetadata {
    pub fn new(
        name: impl Into<String>,
        purpose: KeyPurpose,
        kind: KeyKind,
    ) -> Result<Self, CryptoError> {
        if !kind.allows(purpose) {
            return Err(CryptoError::UnsupportedPurpose { kind, purpose });
        }
        Ok(Self {
            name: name.into(),
            purpose,
            kind,
            versions: Vec::new(),
            encrypted: false,
        })
    }

    pub fn primary(&self) -> Option<&KeyVersion> {
        self.versions.iter().find(|v| v.status == KeyStatus::Primary)
    }

    pub fn version(&self, number: u32) -> Option<&KeyVersion> {
        self.versions.iter().find(|v| v.version_number == number)
    }

    fn version_mut(&mut self, number: u32) -> Result<&mut KeyVersion, CryptoError> {
        self.versions
            .iter_mut()
            .find(|v| v.version_number == number)
            .ok_or(CryptoError::NoSuchVersion(number))
    }

    /// Register a new version, returning its number.
    ///
    /// Adding a primary demotes the previous primary to active.
    pub fn add_version(&mut self, status: KeyStatus) -> u32 {
        let number = self
            .versions
            .iter()
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1;

        if status == KeyStatus::Primary {
            self.demote_current_primary();
        }
        self.versions.push(KeyVersion {
            version_number: number,
            status,
        });
        number
    }

    /// Inactive → active → primary
    pub fn promote(&mut self, number: u32) -> Result<KeyStatus, CryptoError> {
        let status = self.version_mut(number)?.status;
        let promoted = match status {
            KeyStatus::Inactive => KeyStatus::Active,
            KeyStatus::Active => {
                self.demote_current_primary();
                KeyStatus::Primary
            }
            KeyStatus::Primary => {
                return Err(CryptoError::InvalidStatusChange {
                    version: number,
                    reason: "already primary",
                })
            }
        };
        self.version_mut(number)?.status = promoted;
        Ok(promoted)
    }

    /// Primary → active → inactive
    pub fn demote(&mut self, number: u32) -> Result<KeyStatus, CryptoError> {
        let version = self.version_mut(number)?;
        version.status = match version.status {
            KeyStatus::Primary => KeyStatus::Active,
            KeyStatus::Active => KeyStatus::Inactive,
            KeyStatus::Inactive => {
                return Err(CryptoError::InvalidStatusChange {
                    version: number,
                    reason: "already inactive",
                })
            }
        };
        Ok(version.status)
    }

    /// Drop an inactive version from the metadata
    pub fn revoke(&mut self, number: u32) -> Result<(), CryptoError> {
        if self.version_mut(number)?.status != KeyStatus::Inactive {
            return Err(CryptoError::InvalidStatusChange {
                version: number,
                reason: "only inactive versions can be revoked",
            });
        }
        self.versions.retain(|v| v.version_number != number);
        Ok(())
    }

    fn demote_current_primary(&mut self) {
        for version in &mut self.versions {
            if version.status == KeyStatus::Primary {
                version.status = KeyStatus::Active;
            }
        }
    }
}

/// A fully loaded key set
#[derive(Debug, Clone)]
pub struct Keyset {
    metadata: KeysetMetadata,
    keys: BTreeMap<u32, KeyMaterial>,
}

impl Keyset {
    /// Load metadata and every listed version from a reader
    pub fn read(reader: &dyn KeyReader) -> Result<Self, CryptoError> {
        let metadata: KeysetMetadata = serde_json::from_str(&reader.metadata()?)?;

        let mut keys = BTreeMap::new();
        for version in &metadata.versions {
            let raw = reader.key(version.version_number)?;
            if metadata.encrypted && !raw.trim_start().starts_with('{') {
                return Err(CryptoError::EncryptedKeyset);
            }

            let material: KeyMaterial = serde_json::from_str(&raw)?;
            if material.kind() != metadata.kind {
                return Err(CryptoError::Malformed(format!(
                    "version {} holds {:?}, key set declares {:?}",
                    version.version_number,
                    material.kind(),
                    metadata.kind
                )));
            }
            keys.insert(version.version_number, material);
        }

        debug!(
            name = %metadata.name,
            purpose = ?metadata.purpose,
            versions = keys.len(),
            "loaded key set"
        );
        Ok(Self { metadata, keys })
    }

    pub fn from_parts(metadata: KeysetMetadata, keys: BTreeMap<u32, KeyMaterial>) -> Self {
        Self { metadata, keys }
    }

    pub fn metadata(&self) -> &KeysetMetadata {
        &self.metadata
    }

    pub fn purpose(&self) -> KeyPurpose {
        self.metadata.purpose
    }

    pub fn key(&self, number: u32) -> Option<&KeyMaterial> {
        self.keys.get(&number)
    }

    /// Material of the primary version
    pub fn primary_key(&self) -> Result<&KeyMaterial, CryptoError> {
        self.metadata
            .primary()
            .and_then(|v| self.keys.get(&v.version_number))
            .ok_or(CryptoError::NoPrimaryKey)
    }

    /// Every loaded version in ascending order
    pub fn keys(&self) -> impl Iterator<Item = (u32, &KeyMaterial)> {
        self.keys.iter().map(|(n, k)| (*n, k))
    }

    /// Refuse roles the key set's purpose does not grant
    pub fn require_role(&self, role: KeyRole) -> Result<(), CryptoError> {
        if role.accepts(self.metadata.purpose) {
            Ok(())
        } else {
            Err(CryptoError::UnacceptablePurpose {
                role,
                purpose: self.metadata.purpose,
            })
        }
    }
}
