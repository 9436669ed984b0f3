//! Web-safe encoding, randomness and key derivation helpers

use crate::CryptoError;
use base64::{engine::general_purpose, Engine as _};
use ring::hkdf;
use ring::rand::{SecureRandom, SystemRandom};

/// Size of keys produced by [`derive_key`]
pub const DERIVED_KEY_SIZE: usize = 32;

/// Encode bytes as URL-safe base64 without padding
pub fn encode_web_safe(data: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(data)
}

/// Decode URL-safe base64.
///
/// Surrounding whitespace and trailing padding are tolerated since other
/// implementations are not consistent about emitting them.
pub fn decode_web_safe(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let trimmed = encoded.trim().trim_end_matches('=');
    general_purpose::URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| CryptoError::Encoding(format!("Invalid web-safe base64: {e}")))
}

/// Fill a fresh buffer from the system RNG
pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buf = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| CryptoError::KeyGenerationFailed("System RNG unavailable".to_string()))?;
    Ok(buf)
}

/// Derive a 32-byte key from shared secret material using HKDF-SHA256.
///
/// `info` parts are concatenated by HKDF itself.
pub fn derive_key(secret: &[u8], info: &[&[u8]]) -> Result<[u8; DERIVED_KEY_SIZE], CryptoError> {
    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, &[]);
    let prk = salt.extract(secret);

    let mut output = [0u8; DERIVED_KEY_SIZE];
    let okm = prk
        .expand(info, hkdf::HKDF_SHA256)
        .map_err(|_| CryptoError::KeyDerivationFailed("HKDF expansion failed".to_string()))?;
    okm.fill(&mut output).map_err(|_| {
        CryptoError::KeyDerivationFailed("Failed to fill output buffer".to_string())
    })?;

    Ok(output)
}
