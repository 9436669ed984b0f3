//! Key material for every supported key kind
//!
//! `KeyMaterial` is the serialized form stored in key set files. Before use it
//! is parsed into one of the runtime key types (`SigningKey`, `VerifyingKey`,
//! `EncryptingKey`, `DecryptingKey`), which is where role separation happens:
//! a verifying or encrypting key never carries private material.

use crate::cipher::{create_cipher, open, seal, CipherAlgorithm};
use crate::encoding::{decode_web_safe, derive_key, encode_web_safe, random_bytes};
use crate::format::{split_header, KeyHash, HEADER_SIZE, KEY_HASH_SIZE};
use crate::keyset::KeyPurpose;
use crate::CryptoError;
use rand::rngs::OsRng;
use ring::rand::SystemRandom;
use ring::signature::{
    self, EcdsaKeyPair, Ed25519KeyPair, KeyPair, UnparsedPublicKey,
    ECDSA_P256_SHA256_ASN1_SIGNING,
};
use ring::{digest, hmac};
use serde::{Deserialize, Serialize};
use std::fmt;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey, StaticSecret};

/// Size of a generated HMAC key
pub const HMAC_KEY_SIZE: usize = 32;

const X25519_KEY_SIZE: usize = 32;

/// Cipher used for the payload half of hybrid encryption
const HYBRID_CIPHER: CipherAlgorithm = CipherAlgorithm::Aes256Gcm;

const HYBRID_INFO: &[u8] = b"keystone-hybrid-v1";

/// Kind of key stored in a key set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyKind {
    HmacSha256,
    Ed25519Priv,
    Ed25519Pub,
    EcdsaP256Priv,
    EcdsaP256Pub,
    Aead,
    X25519Priv,
    X25519Pub,
}

impl KeyKind {
    /// Kind of the exported public half, if this kind has one
    pub fn public_kind(&self) -> Option<KeyKind> {
        match self {
            KeyKind::Ed25519Priv => Some(KeyKind::Ed25519Pub),
            KeyKind::EcdsaP256Priv => Some(KeyKind::EcdsaP256Pub),
            KeyKind::X25519Priv => Some(KeyKind::X25519Pub),
            _ => None,
        }
    }

    /// Whether keys of this kind may live in a key set with `purpose`
    pub fn allows(&self, purpose: KeyPurpose) -> bool {
        matches!(
            (self, purpose),
            (KeyKind::HmacSha256, KeyPurpose::SignAndVerify)
                | (KeyKind::Ed25519Priv, KeyPurpose::SignAndVerify)
                | (KeyKind::EcdsaP256Priv, KeyPurpose::SignAndVerify)
                | (KeyKind::Ed25519Pub, KeyPurpose::Verify)
                | (KeyKind::EcdsaP256Pub, KeyPurpose::Verify)
                | (KeyKind::Aead, KeyPurpose::DecryptAndEncrypt)
                | (KeyKind::X25519Priv, KeyPurpose::DecryptAndEncrypt)
                | (KeyKind::X25519Pub, KeyPurpose::Encrypt)
        )
    }
}

/// Serialized key material, as stored in one version file of a key set.
///
/// Binary fields are web-safe base64.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyMaterial {
    HmacSha256 { key: String },
    Ed25519Priv { pkcs8: String, public: String },
    Ed25519Pub { public: String },
    EcdsaP256Priv { pkcs8: String, public: String },
    EcdsaP256Pub { public: String },
    Aead { algorithm: CipherAlgorithm, key: String },
    X25519Priv { secret: String, public: String },
    X25519Pub { public: String },
}

// Secrets stay out of logs.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

impl KeyMaterial {
    /// Generate fresh key material of the given kind.
    ///
    /// `cipher` only matters for [`KeyKind::Aead`]. Public kinds cannot be
    /// generated directly; export them from a private key with [`Self::public`].
    pub fn generate(kind: KeyKind, cipher: CipherAlgorithm) -> Result<Self, CryptoError> {
        let rng = SystemRandom::new();
        match kind {
            KeyKind::HmacSha256 => Ok(KeyMaterial::HmacSha256 {
                key: encode_web_safe(&random_bytes(HMAC_KEY_SIZE)?),
            }),
            KeyKind::Ed25519Priv => {
                let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).map_err(|_| {
                    CryptoError::KeyGenerationFailed("Ed25519 generation failed".to_string())
                })?;
                let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())
                    .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
                Ok(KeyMaterial::Ed25519Priv {
                    pkcs8: encode_web_safe(pkcs8.as_ref()),
                    public: encode_web_safe(pair.public_key().as_ref()),
                })
            }
            KeyKind::EcdsaP256Priv => {
                let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng)
                    .map_err(|_| {
                        CryptoError::KeyGenerationFailed("ECDSA generation failed".to_string())
                    })?;
                let pair =
                    EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref(), &rng)
                        .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
                Ok(KeyMaterial::EcdsaP256Priv {
                    pkcs8: encode_web_safe(pkcs8.as_ref()),
                    public: encode_web_safe(pair.public_key().as_ref()),
                })
            }
            KeyKind::Aead => Ok(KeyMaterial::Aead {
                algorithm: cipher,
                key: encode_web_safe(&random_bytes(cipher.key_size())?),
            }),
            KeyKind::X25519Priv => {
                let secret = StaticSecret::random_from_rng(OsRng);
                let public = X25519PublicKey::from(&secret);
                Ok(KeyMaterial::X25519Priv {
                    secret: encode_web_safe(&secret.to_bytes()),
                    public: encode_web_safe(public.as_bytes()),
                })
            }
            KeyKind::Ed25519Pub | KeyKind::EcdsaP256Pub | KeyKind::X25519Pub => {
                Err(CryptoError::WrongKeyKind {
                    expected: "a private or symmetric kind",
                    got: kind,
                })
            }
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            KeyMaterial::HmacSha256 { .. } => KeyKind::HmacSha256,
            KeyMaterial::Ed25519Priv { .. } => KeyKind::Ed25519Priv,
            KeyMaterial::Ed25519Pub { .. } => KeyKind::Ed25519Pub,
            KeyMaterial::EcdsaP256Priv { .. } => KeyKind::EcdsaP256Priv,
            KeyMaterial::EcdsaP256Pub { .. } => KeyKind::EcdsaP256Pub,
            KeyMaterial::Aead { .. } => KeyKind::Aead,
            KeyMaterial::X25519Priv { .. } => KeyKind::X25519Priv,
            KeyMaterial::X25519Pub { .. } => KeyKind::X25519Pub,
        }
    }

    /// Export the public half of an asymmetric private key
    pub fn public(&self) -> Result<KeyMaterial, CryptoError> {
        match self {
            KeyMaterial::Ed25519Priv { public, .. } => Ok(KeyMaterial::Ed25519Pub {
                public: public.clone(),
            }),
            KeyMaterial::EcdsaP256Priv { public, .. } => Ok(KeyMaterial::EcdsaP256Pub {
                public: public.clone(),
            }),
            KeyMaterial::X25519Priv { public, .. } => Ok(KeyMaterial::X25519Pub {
                public: public.clone(),
            }),
            other => Err(CryptoError::WrongKeyKind {
                expected: "an asymmetric private key",
                got: other.kind(),
            }),
        }
    }

    /// Identifier written into artifact headers.
    ///
    /// Computed over the public (or symmetric) bytes so a private key and its
    /// exported public half hash identically.
    pub fn hash(&self) -> Result<KeyHash, CryptoError> {
        let (tag, bytes): (&[u8], Vec<u8>) = match self {
            KeyMaterial::HmacSha256 { key } => (&b"HMAC_SHA256"[..], decode_web_safe(key)?),
            KeyMaterial::Ed25519Priv { public, .. } | KeyMaterial::Ed25519Pub { public } => {
                (&b"ED25519"[..], decode_web_safe(public)?)
            }
            KeyMaterial::EcdsaP256Priv { public, .. } | KeyMaterial::EcdsaP256Pub { public } => {
                (&b"ECDSA_P256"[..], decode_web_safe(public)?)
            }
            KeyMaterial::Aead { key, .. } => (&b"AEAD"[..], decode_web_safe(key)?),
            KeyMaterial::X25519Priv { public, .. } | KeyMaterial::X25519Pub { public } => {
                (&b"X25519"[..], decode_web_safe(public)?)
            }
        };

        let mut ctx = digest::Context::new(&digest::SHA256);
        ctx.update(tag);
        ctx.update(&[0]);
        ctx.update(&bytes);
        let digest = ctx.finish();

        let mut hash = [0u8; KEY_HASH_SIZE];
        hash.copy_from_slice(&digest.as_ref()[..KEY_HASH_SIZE]);
        Ok(hash)
    }

    pub(crate) fn signing_key(&self) -> Result<SigningKey, CryptoError> {
        match self {
            KeyMaterial::HmacSha256 { key } => Ok(SigningKey::Hmac(hmac::Key::new(
                hmac::HMAC_SHA256,
                &decode_web_safe(key)?,
            ))),
            KeyMaterial::Ed25519Priv { pkcs8, .. } => {
                let pair = Ed25519KeyPair::from_pkcs8(&decode_web_safe(pkcs8)?)
                    .map_err(|e| CryptoError::Malformed(format!("Ed25519 key rejected: {e}")))?;
                Ok(SigningKey::Ed25519(pair))
            }
            KeyMaterial::EcdsaP256Priv { pkcs8, .. } => {
                let pair = EcdsaKeyPair::from_pkcs8(
                    &ECDSA_P256_SHA256_ASN1_SIGNING,
                    &decode_web_safe(pkcs8)?,
                    &SystemRandom::new(),
                )
                .map_err(|e| CryptoError::Malformed(format!("ECDSA key rejected: {e}")))?;
                Ok(SigningKey::EcdsaP256(pair))
            }
            other => Err(CryptoError::WrongKeyKind {
                expected: "a signing key",
                got: other.kind(),
            }),
        }
    }

    pub(crate) fn verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        match self {
            KeyMaterial::HmacSha256 { key } => Ok(VerifyingKey::Hmac(hmac::Key::new(
                hmac::HMAC_SHA256,
                &decode_web_safe(key)?,
            ))),
            KeyMaterial::Ed25519Priv { public, .. } | KeyMaterial::Ed25519Pub { public } => {
                Ok(VerifyingKey::Ed25519(decode_web_safe(public)?))
            }
            KeyMaterial::EcdsaP256Priv { public, .. } | KeyMaterial::EcdsaP256Pub { public } => {
                Ok(VerifyingKey::EcdsaP256(decode_web_safe(public)?))
            }
            other => Err(CryptoError::WrongKeyKind {
                expected: "a signing or verifying key",
                got: other.kind(),
            }),
        }
    }

    pub(crate) fn encrypting_key(&self) -> Result<EncryptingKey, CryptoError> {
        match self {
            KeyMaterial::Aead { algorithm, key } => Ok(EncryptingKey::Aead {
                algorithm: *algorithm,
                key: decode_web_safe(key)?,
            }),
            KeyMaterial::X25519Priv { public, .. } | KeyMaterial::X25519Pub { public } => Ok(
                EncryptingKey::X25519(X25519PublicKey::from(to_x25519_bytes(public)?)),
            ),
            other => Err(CryptoError::WrongKeyKind {
                expected: "an encryption key",
                got: other.kind(),
            }),
        }
    }

    pub(crate) fn decrypting_key(&self) -> Result<DecryptingKey, CryptoError> {
        match self {
            KeyMaterial::Aead { algorithm, key } => Ok(DecryptingKey::Aead {
                algorithm: *algorithm,
                key: decode_web_safe(key)?,
            }),
            KeyMaterial::X25519Priv { secret, public } => Ok(DecryptingKey::X25519 {
                secret: StaticSecret::from(to_x25519_bytes(secret)?),
                public: X25519PublicKey::from(to_x25519_bytes(public)?),
            }),
            other => Err(CryptoError::WrongKeyKind {
                expected: "a decryption key",
                got: other.kind(),
            }),
        }
    }
}

fn to_x25519_bytes(encoded: &str) -> Result<[u8; X25519_KEY_SIZE], CryptoError> {
    let bytes = decode_web_safe(encoded)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidKeyLength {
            expected: X25519_KEY_SIZE,
            got: bytes.len(),
        })
}

/// Private signing key, parsed and ready to use
pub(crate) enum SigningKey {
    Hmac(hmac::Key),
    Ed25519(Ed25519KeyPair),
    EcdsaP256(EcdsaKeyPair),
}

impl SigningKey {
    pub(crate) fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            SigningKey::Hmac(key) => Ok(hmac::sign(key, message).as_ref().to_vec()),
            SigningKey::Ed25519(pair) => Ok(pair.sign(message).as_ref().to_vec()),
            SigningKey::EcdsaP256(pair) => pair
                .sign(&SystemRandom::new(), message)
                .map(|sig| sig.as_ref().to_vec())
                .map_err(|_| CryptoError::SigningFailed),
        }
    }
}

/// Key able to check signatures and nothing more
#[derive(Clone)]
pub(crate) enum VerifyingKey {
    Hmac(hmac::Key),
    Ed25519(Vec<u8>),
    EcdsaP256(Vec<u8>),
}

impl VerifyingKey {
    pub(crate) fn verify(&self, message: &[u8], sig: &[u8]) -> bool {
        match self {
            VerifyingKey::Hmac(key) => hmac::verify(key, message, sig).is_ok(),
            VerifyingKey::Ed25519(public) => UnparsedPublicKey::new(&signature::ED25519, public)
                .verify(message, sig)
                .is_ok(),
            VerifyingKey::EcdsaP256(public) => {
                UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_ASN1, public)
                    .verify(message, sig)
                    .is_ok()
            }
        }
    }
}

/// Key able to produce ciphertexts only
pub(crate) enum EncryptingKey {
    Aead { algorithm: CipherAlgorithm, key: Vec<u8> },
    X25519(X25519PublicKey),
}

impl EncryptingKey {
    /// Encrypt `plaintext`, binding `header` as associated data and
    /// returning `header || body`.
    pub(crate) fn encrypt(
        &self,
        header: &[u8; HEADER_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut out = header.to_vec();
        match self {
            EncryptingKey::Aead { algorithm, key } => {
                let cipher = create_cipher(*algorithm, key)?;
                out.extend_from_slice(&seal(cipher.as_ref(), plaintext, header)?);
            }
            EncryptingKey::X25519(recipient) => {
                let ephemeral = EphemeralSecret::random_from_rng(OsRng);
                let ephemeral_public = X25519PublicKey::from(&ephemeral);
                let shared = ephemeral.diffie_hellman(recipient);

                let key = derive_key(
                    shared.as_bytes(),
                    &[HYBRID_INFO, ephemeral_public.as_bytes(), recipient.as_bytes()],
                )?;
                let cipher = create_cipher(HYBRID_CIPHER, &key)?;

                out.extend_from_slice(ephemeral_public.as_bytes());
                out.extend_from_slice(&seal(cipher.as_ref(), plaintext, header)?);
            }
        }
        Ok(out)
    }
}

/// Key able to decrypt, and by extension encrypt
pub(crate) enum DecryptingKey {
    Aead {
        algorithm: CipherAlgorithm,
        key: Vec<u8>,
    },
    X25519 {
        secret: StaticSecret,
        public: X25519PublicKey,
    },
}

impl DecryptingKey {
    pub(crate) fn encrypting_key(&self) -> EncryptingKey {
        match self {
            DecryptingKey::Aead { algorithm, key } => EncryptingKey::Aead {
                algorithm: *algorithm,
                key: key.clone(),
            },
            DecryptingKey::X25519 { public, .. } => EncryptingKey::X25519(*public),
        }
    }

    /// Decrypt a full `header || body` ciphertext
    pub(crate) fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (_, body) = split_header(ciphertext)?;
        let header = &ciphertext[..HEADER_SIZE];

        match self {
            DecryptingKey::Aead { algorithm, key } => {
                let cipher = create_cipher(*algorithm, key)?;
                open(cipher.as_ref(), body, header)
            }
            DecryptingKey::X25519 { secret, public } => {
                if body.len() < X25519_KEY_SIZE {
                    return Err(CryptoError::ShortInput {
                        expected: X25519_KEY_SIZE,
                        got: body.len(),
                    });
                }
                let (ephemeral, sealed) = body.split_at(X25519_KEY_SIZE);
                let mut ephemeral_bytes = [0u8; X25519_KEY_SIZE];
                ephemeral_bytes.copy_from_slice(ephemeral);
                let ephemeral_public = X25519PublicKey::from(ephemeral_bytes);
                let shared = secret.diffie_hellman(&ephemeral_public);

                let key = derive_key(
                    shared.as_bytes(),
                    &[HYBRID_INFO, ephemeral_public.as_bytes(), public.as_bytes()],
                )?;
                let cipher = create_cipher(HYBRID_CIPHER, &key)?;
                open(cipher.as_ref(), sealed, header)
            }
        }
    }
}
