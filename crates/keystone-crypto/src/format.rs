//! Output header shared by versioned signatures and ciphertexts
//!
//! Every versioned artifact starts with a format version byte followed by the
//! hash of the key that produced it, so consumers can pick the right version
//! out of a key set without trial decryption.

use crate::CryptoError;

/// Current artifact format version
pub const FORMAT_VERSION: u8 = 0;

/// Size of the truncated key hash in bytes
pub const KEY_HASH_SIZE: usize = 4;

/// Version byte plus key hash
pub const HEADER_SIZE: usize = 1 + KEY_HASH_SIZE;

/// Truncated SHA-256 identifying a key version
pub type KeyHash = [u8; KEY_HASH_SIZE];

/// Build the header for a key
pub fn header(hash: &KeyHash) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    out[0] = FORMAT_VERSION;
    out[1..].copy_from_slice(hash);
    out
}

/// Split an artifact into its key hash and the bytes following the header
pub fn split_header(data: &[u8]) -> Result<(KeyHash, &[u8]), CryptoError> {
    if data.len() < HEADER_SIZE {
        return Err(CryptoError::ShortInput {
            expected: HEADER_SIZE,
            got: data.len(),
        });
    }
    if data[0] != FORMAT_VERSION {
        return Err(CryptoError::BadVersion(data[0]));
    }

    let mut hash = [0u8; KEY_HASH_SIZE];
    hash.copy_from_slice(&data[1..HEADER_SIZE]);
    Ok((hash, &data[HEADER_SIZE..]))
}

/// Append a big-endian length prefix followed by the bytes themselves
pub(crate) fn put_length_prefixed(out: &mut Vec<u8>, data: &[u8]) -> Result<(), CryptoError> {
    let len = u32::try_from(data.len())
        .map_err(|_| CryptoError::Malformed("Length prefix overflow".to_string()))?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(data);
    Ok(())
}

/// Read a length-prefixed field, returning it and the remaining bytes
pub(crate) fn take_length_prefixed(data: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    if data.len() < 4 {
        return Err(CryptoError::ShortInput {
            expected: 4,
            got: data.len(),
        });
    }

    let (len_bytes, rest) = data.split_at(4);
    let mut len = [0u8; 4];
    len.copy_from_slice(len_bytes);
    let len = u32::from_be_bytes(len) as usize;

    if rest.len() < len {
        return Err(CryptoError::ShortInput {
            expected: len,
            got: rest.len(),
        });
    }
    Ok(rest.split_at(len))
}
