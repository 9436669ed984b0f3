//! Signing and verification roles
//!
//! Versioned signatures carry a header naming the key that produced them;
//! unversioned signatures are the bare primitive output and are checked
//! against every key in the set.

use crate::format::{
    header, put_length_prefixed, split_header, take_length_prefixed, KeyHash, FORMAT_VERSION,
    HEADER_SIZE,
};
use crate::keys::{SigningKey, VerifyingKey};
use crate::keyset::{KeyRole, Keyset};
use crate::reader::KeyReader;
use crate::CryptoError;
use tracing::debug;

/// Message covered by a versioned signature
fn versioned_message(data: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(data.len() + 1);
    message.extend_from_slice(data);
    message.push(FORMAT_VERSION);
    message
}

/// Message covered by an attached signature; the nonce is signed but not carried
fn attached_message(data: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut message = Vec::with_capacity(4 + nonce.len() + data.len() + 1);
    put_length_prefixed(&mut message, nonce)?;
    message.extend_from_slice(data);
    message.push(FORMAT_VERSION);
    Ok(message)
}

/// Pieces of an attached signature
struct Attached<'a> {
    hash: KeyHash,
    data: &'a [u8],
    signature: &'a [u8],
}

fn parse_attached(signed: &[u8]) -> Result<Attached<'_>, CryptoError> {
    let (hash, body) = split_header(signed)?;
    let (data, signature) = take_length_prefixed(body)?;
    Ok(Attached {
        hash,
        data,
        signature,
    })
}

/// Public-only signature checker
#[derive(Clone)]
pub struct Verifier {
    keys: Vec<(KeyHash, VerifyingKey)>,
}

impl Verifier {
    pub fn read(reader: &dyn KeyReader) -> Result<Self, CryptoError> {
        Self::from_keyset(&Keyset::read(reader)?)
    }

    /// Accepts signing and verify-only key sets; private halves are discarded
    pub fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError> {
        keyset.require_role(KeyRole::Verifier)?;
        Self::collect(keyset)
    }

    fn collect(keyset: &Keyset) -> Result<Self, CryptoError> {
        let keys = keyset
            .keys()
            .map(|(_, material)| Ok((material.hash()?, material.verifying_key()?)))
            .collect::<Result<Vec<_>, CryptoError>>()?;
        Ok(Self { keys })
    }

    fn candidates<'a>(&'a self, hash: &'a KeyHash) -> impl Iterator<Item = &'a VerifyingKey> {
        self.keys
            .iter()
            .filter(move |(h, _)| h == hash)
            .map(|(_, key)| key)
    }

    /// Check a versioned signature over `data`.
    ///
    /// Malformed signatures are errors; well-formed signatures that do not
    /// check out (including ones from unknown keys) yield `false`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let (hash, sig) = split_header(signature)?;
        let message = versioned_message(data);
        let valid = self.candidates(&hash).any(|key| key.verify(&message, sig));
        debug!(valid, "checked versioned signature");
        Ok(valid)
    }

    /// Check an attached signature produced with the same `nonce`
    pub fn attached_verify(&self, signed: &[u8], nonce: &[u8]) -> Result<bool, CryptoError> {
        let attached = parse_attached(signed)?;
        let message = attached_message(attached.data, nonce)?;
        let valid = self
            .candidates(&attached.hash)
            .any(|key| key.verify(&message, attached.signature));
        debug!(valid, "checked attached signature");
        Ok(valid)
    }

    /// Extract the payload of an attached signature without checking it
    pub fn attached_data(signed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(parse_attached(signed)?.data.to_vec())
    }
}

/// Full signing role; verifies as well
pub struct Signer {
    hash: KeyHash,
    key: SigningKey,
    verifier: Verifier,
}

impl Signer {
    pub fn read(reader: &dyn KeyReader) -> Result<Self, CryptoError> {
        Self::from_keyset(&Keyset::read(reader)?)
    }

    pub fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError> {
        keyset.require_role(KeyRole::Signer)?;
        let primary = keyset.primary_key()?;
        Ok(Self {
            hash: primary.hash()?,
            key: primary.signing_key()?,
            verifier: Verifier::collect(keyset)?,
        })
    }

    /// `header || sig(data || version)`
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let sig = self.key.sign(&versioned_message(data))?;
        let mut out = Vec::with_capacity(HEADER_SIZE + sig.len());
        out.extend_from_slice(&header(&self.hash));
        out.extend_from_slice(&sig);
        Ok(out)
    }

    /// `header || len || data || sig(len(nonce) || nonce || data || version)`
    pub fn attached_sign(&self, data: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let sig = self.key.sign(&attached_message(data, nonce)?)?;
        let mut out = header(&self.hash).to_vec();
        put_length_prefixed(&mut out, data)?;
        out.extend_from_slice(&sig);
        Ok(out)
    }

    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        self.verifier.verify(data, signature)
    }

    pub fn attached_verify(&self, signed: &[u8], nonce: &[u8]) -> Result<bool, CryptoError> {
        self.verifier.attached_verify(signed, nonce)
    }
}

/// Public-only checker for header-less signatures
#[derive(Clone)]
pub struct UnversionedVerifier {
    keys: Vec<VerifyingKey>,
}

impl UnversionedVerifier {
    pub fn read(reader: &dyn KeyReader) -> Result<Self, CryptoError> {
        Self::from_keyset(&Keyset::read(reader)?)
    }

    pub fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError> {
        keyset.require_role(KeyRole::UnversionedVerifier)?;
        Self::collect(keyset)
    }

    fn collect(keyset: &Keyset) -> Result<Self, CryptoError> {
        let keys = keyset
            .keys()
            .map(|(_, material)| material.verifying_key())
            .collect::<Result<Vec<_>, CryptoError>>()?;
        Ok(Self { keys })
    }

    /// Any key in the set may have produced the signature
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let valid = self.keys.iter().any(|key| key.verify(data, signature));
        debug!(valid, "checked unversioned signature");
        Ok(valid)
    }
}

pub struct UnversionedSigner {
    key: SigningKey,
    verifier: UnversionedVerifier,
}

impl UnversionedSigner {
    pub fn read(reader: &dyn KeyReader) -> Result<Self, CryptoError> {
        Self::from_keyset(&Keyset::read(reader)?)
    }

    pub fn from_keyset(keyset: &Keyset) -> Result<Self, CryptoError> {
        keyset.require_role(KeyRole::UnversionedSigner)?;
        Ok(Self {
            key: keyset.primary_key()?.signing_key()?,
            verifier: UnversionedVerifier::collect(keyset)?,
        })
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.key.sign(data)
    }

    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        self.verifier.verify(data, signature)
    }
}
