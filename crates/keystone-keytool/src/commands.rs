//! Key tool command implementations

use crate::cli::{resolve_kind, Asymmetric, Purpose, Status};
use crate::writer::KeysetWriter;
use crate::KeytoolError;
use keystone_crypto::{
    CipherAlgorithm, Crypter, EncryptedReader, FileReader, KeyKind, KeyPurpose, KeyReader,
    KeyStatus, Keyset, KeysetMetadata,
};
use std::path::Path;
use tracing::{info, warn};

fn read_metadata(location: &Path) -> Result<KeysetMetadata, KeytoolError> {
    let raw = FileReader::new(location).metadata()?;
    Ok(serde_json::from_str(&raw).map_err(keystone_crypto::CryptoError::from)?)
}

fn open_crypter(path: &Path) -> Result<Crypter, KeytoolError> {
    Ok(Crypter::read(&FileReader::new(path))?)
}

fn symmetric_cipher(
    size: Option<u32>,
    cipher: Option<CipherAlgorithm>,
) -> Result<CipherAlgorithm, KeytoolError> {
    match (cipher, size) {
        (Some(cipher), None) => Ok(cipher),
        (Some(cipher), Some(size)) if cipher.key_size() as u32 * 8 == size => Ok(cipher),
        (Some(cipher), Some(size)) => Err(KeytoolError::InvalidArgument(format!(
            "--size={size} does not match {cipher:?}"
        ))),
        (None, None) | (None, Some(256)) => Ok(CipherAlgorithm::Aes256Gcm),
        (None, Some(128)) => Ok(CipherAlgorithm::Aes128Gcm),
        (None, Some(size)) => Err(KeytoolError::InvalidArgument(format!(
            "unsupported symmetric key size {size}"
        ))),
    }
}

pub fn create(
    location: &Path,
    purpose: Purpose,
    asymmetric: Option<Asymmetric>,
    name: &str,
) -> Result<(), KeytoolError> {
    let (purpose, kind) = resolve_kind(purpose, asymmetric);
    let metadata = KeysetMetadata::new(name, purpose, kind)?;
    KeysetWriter::new(location).create(&metadata)?;
    info!(location = %location.display(), ?purpose, ?kind, "created key set");
    Ok(())
}

pub fn addkey(
    location: &Path,
    status: Status,
    size: Option<u32>,
    cipher: Option<CipherAlgorithm>,
    crypter: Option<&Path>,
) -> Result<u32, KeytoolError> {
    let mut metadata = read_metadata(location)?;
    if metadata.encrypted && crypter.is_none() {
        return Err(KeytoolError::CrypterRequired(location.to_path_buf()));
    }
    if !metadata.encrypted && crypter.is_some() && !metadata.versions.is_empty() {
        return Err(KeytoolError::InvalidArgument(
            "cannot add an encrypted key to a plaintext key set".to_string(),
        ));
    }

    let cipher = if metadata.kind == KeyKind::Aead {
        symmetric_cipher(size, cipher)?
    } else {
        if size.is_some() || cipher.is_some() {
            warn!("--size and --cipher only apply to symmetric crypt key sets; ignoring");
        }
        CipherAlgorithm::Aes256Gcm
    };

    let wrapping = crypter.map(open_crypter).transpose()?;
    let material = keystone_crypto::KeyMaterial::generate(metadata.kind, cipher)?;

    let version = metadata.add_version(KeyStatus::from(status));
    metadata.encrypted = wrapping.is_some();

    let writer = KeysetWriter::new(location);
    writer.write_key(version, &material, wrapping.as_ref())?;
    writer.write_metadata(&metadata)?;

    info!(
        location = %location.display(),
        version,
        ?status,
        encrypted = metadata.encrypted,
        "added key"
    );
    Ok(version)
}

pub fn pubkey(
    location: &Path,
    destination: &Path,
    crypter: Option<&Path>,
) -> Result<(), KeytoolError> {
    let reader: Box<dyn KeyReader> = match crypter {
        Some(path) => Box::new(EncryptedReader::new(
            FileReader::new(location),
            open_crypter(path)?,
        )),
        None => Box::new(FileReader::new(location)),
    };
    let keyset = Keyset::read(&reader)?;
    let source = keyset.metadata();

    let public_kind = source
        .kind
        .public_kind()
        .ok_or(keystone_crypto::CryptoError::WrongKeyKind {
            expected: "an asymmetric private key set",
            got: source.kind,
        })?;
    let public_purpose = match source.purpose {
        KeyPurpose::SignAndVerify => KeyPurpose::Verify,
        _ => KeyPurpose::Encrypt,
    };

    let mut metadata = KeysetMetadata::new(source.name.clone(), public_purpose, public_kind)?;
    metadata.versions = source.versions.clone();

    let writer = KeysetWriter::new(destination);
    writer.create(&metadata)?;
    for (version, material) in keyset.keys() {
        writer.write_key(version, &material.public()?, None)?;
    }

    info!(
        source = %location.display(),
        destination = %destination.display(),
        "exported public keys"
    );
    Ok(())
}

pub fn promote(location: &Path, version: u32) -> Result<KeyStatus, KeytoolError> {
    let mut metadata = read_metadata(location)?;
    let status = metadata.promote(version)?;
    KeysetWriter::new(location).write_metadata(&metadata)?;
    info!(location = %location.display(), version, ?status, "promoted key");
    Ok(status)
}

pub fn demote(location: &Path, version: u32) -> Result<KeyStatus, KeytoolError> {
    let mut metadata = read_metadata(location)?;
    let status = metadata.demote(version)?;
    KeysetWriter::new(location).write_metadata(&metadata)?;
    info!(location = %location.display(), version, ?status, "demoted key");
    Ok(status)
}

pub fn revoke(location: &Path, version: u32) -> Result<(), KeytoolError> {
    let mut metadata = read_metadata(location)?;
    metadata.revoke(version)?;

    let writer = KeysetWriter::new(location);
    writer.write_metadata(&metadata)?;
    writer.remove_key(version)?;
    info!(location = %location.display(), version, "revoked key");
    Ok(())
}
