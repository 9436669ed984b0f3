//! Signed sessions: hybrid encryption with an authenticated session key
//!
//! The producer creates an ephemeral AEAD key, encrypts it to a long-lived
//! encryption identity and signs the result with a long-lived signing
//! identity. That signed blob is the session material. Payloads are then
//! encrypted under the ephemeral key.
//!
//! The consumer checks the signature on the session material before the
//! encrypted session key is ever handed to a decrypter.

use crate::cipher::{create_cipher, open, seal, CipherAlgorithm};
use crate::crypt::{Crypter, Encrypter};
use crate::encoding::{decode_web_safe, encode_web_safe, random_bytes};
use crate::sign::{Signer, Verifier};
use crate::CryptoError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Size of the random nonce bound into every session
pub const SESSION_NONCE_SIZE: usize = 16;

const SESSION_CIPHER: CipherAlgorithm = CipherAlgorithm::Aes256Gcm;

/// Hidden nonce for the attached signature over the encrypted session key
const SESSION_MATERIAL_NONCE: &[u8] = b"keystone-session";

/// Session key as it travels inside the session material
#[derive(Serialize, Deserialize)]
struct PackedSessionKey {
    algorithm: CipherAlgorithm,
    key: String,
    nonce: String,
}

struct Session {
    algorithm: CipherAlgorithm,
    key: Vec<u8>,
    nonce: Vec<u8>,
}

impl Session {
    fn generate() -> Result<Self, CryptoError> {
        Ok(Self {
            algorithm: SESSION_CIPHER,
            key: random_bytes(SESSION_CIPHER.key_size())?,
            nonce: random_bytes(SESSION_NONCE_SIZE)?,
        })
    }

    fn pack(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(serde_json::to_vec(&PackedSessionKey {
            algorithm: self.algorithm,
            key: encode_web_safe(&self.key),
            nonce: encode_web_safe(&self.nonce),
        })?)
    }

    fn unpack(packed: &[u8]) -> Result<Self, CryptoError> {
        let packed: PackedSessionKey = serde_json::from_slice(packed)?;
        let nonce = decode_web_safe(&packed.nonce)?;
        if nonce.len() != SESSION_NONCE_SIZE {
            return Err(CryptoError::InvalidNonceLength {
                expected: SESSION_NONCE_SIZE,
                got: nonce.len(),
            });
        }
        Ok(Self {
            algorithm: packed.algorithm,
            key: decode_web_safe(&packed.key)?,
            nonce,
        })
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = create_cipher(self.algorithm, &self.key)?;
        seal(cipher.as_ref(), plaintext, &self.nonce)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = create_cipher(self.algorithm, &self.key)?;
        open(cipher.as_ref(), ciphertext, &self.nonce)
    }
}

/// Producer side of a signed session
pub struct SignedSessionEncrypter {
    session: Session,
    material: String,
}

impl SignedSessionEncrypter {
    /// Create a fresh session key, encrypt it with `encrypter` and sign the
    /// ciphertext with `signer`.
    pub fn new(encrypter: &Encrypter, signer: &Signer) -> Result<Self, CryptoError> {
        let session = Session::generate()?;
        let encrypted_key = encrypter.encrypt(&session.pack()?)?;
        let signed_key = signer.attached_sign(&encrypted_key, SESSION_MATERIAL_NONCE)?;
        debug!(
            encrypted_key_len = encrypted_key.len(),
            "session key encrypted and signed"
        );

        Ok(Self {
            session,
            material: encode_web_safe(&signed_key),
        })
    }

    /// Web-safe encoded session material for the consumer
    pub fn session_material(&self) -> &str {
        &self.material
    }

    /// Encrypt a payload under the session key, web-safe encoded
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        Ok(encode_web_safe(&self.session.encrypt(plaintext)?))
    }
}

/// Consumer side of a signed session
pub struct SignedSessionDecrypter {
    session: Session,
}

impl SignedSessionDecrypter {
    /// Authenticate `material` with `verifier`, then recover the session key
    /// with `crypter`. A bad signature stops here with
    /// [`CryptoError::SignatureInvalid`]; the key is never decrypted.
    pub fn new(
        crypter: &Crypter,
        verifier: &Verifier,
        material: &str,
    ) -> Result<Self, CryptoError> {
        let signed_key = decode_web_safe(material)?;
        // Material that does not even parse as an attached signature is
        // reported the same way as one that fails to verify
        let authentic = verifier
            .attached_verify(&signed_key, SESSION_MATERIAL_NONCE)
            .unwrap_or_else(|e| {
                debug!("malformed session material: {e}");
                false
            });
        if !authentic {
            return Err(CryptoError::SignatureInvalid);
        }
        debug!("session material signature verified");

        let encrypted_key = Verifier::attached_data(&signed_key)?;
        let session = Session::unpack(&crypter.decrypt(&encrypted_key)?)?;
        debug!("session key decrypted");

        Ok(Self { session })
    }

    /// Decrypt a web-safe encoded payload
    pub fn decrypt(&self, ciphertext: &str) -> Result<Vec<u8>, CryptoError> {
        self.session.decrypt(&decode_web_safe(ciphertext)?)
    }
}
