use keystone_crypto::{
    CipherAlgorithm, KeyKind, KeyMaterial, KeyPurpose, KeyStatus, Keyset, KeysetMetadata,
};
use std::collections::BTreeMap;

/// In-memory key set with a single primary version
pub fn keyset(purpose: KeyPurpose, kind: KeyKind) -> Keyset {
    keyset_with_cipher(purpose, kind, CipherAlgorithm::Aes256Gcm)
}

pub fn keyset_with_cipher(purpose: KeyPurpose, kind: KeyKind, cipher: CipherAlgorithm) -> Keyset {
    let mut metadata = KeysetMetadata::new("test", purpose, kind).expect("metadata");
    let version = metadata.add_version(KeyStatus::Primary);
    let mut keys = BTreeMap::new();
    keys.insert(version, KeyMaterial::generate(kind, cipher).expect("generate"));
    Keyset::from_parts(metadata, keys)
}

/// Export the public half of a private key set
pub fn public_keyset(private: &Keyset) -> Keyset {
    let kind = private.metadata().kind.public_kind().expect("asymmetric kind");
    let purpose = match private.purpose() {
        KeyPurpose::SignAndVerify => KeyPurpose::Verify,
        _ => KeyPurpose::Encrypt,
    };

    let mut metadata = KeysetMetadata::new("test-public", purpose, kind).expect("metadata");
    metadata.versions = private.metadata().versions.clone();
    let keys = private
        .keys()
        .map(|(n, k)| (n, k.public().expect("public")))
        .collect::<BTreeMap<_, _>>();
    Keyset::from_parts(metadata, keys)
}
