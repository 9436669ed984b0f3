//! Output encodings
//!
//! Two layers: the optional inner encoding a request asks for with the
//! `encoding` option, and the outer web-safe base64 that every simple
//! artifact gets inside its JSON envelope.

use keystone_crypto::{decode_web_safe, encode_web_safe, CryptoError};

/// Value of the `encoding` option that selects web-safe base64
pub const ENCODED: &str = "encoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Identity,
    WebSafe,
}

impl Encoding {
    pub fn from_option(value: &str) -> Self {
        if value == ENCODED {
            Encoding::WebSafe
        } else {
            Encoding::Identity
        }
    }

    pub fn encode(self, bytes: Vec<u8>) -> Vec<u8> {
        match self {
            Encoding::Identity => bytes,
            Encoding::WebSafe => encode_web_safe(&bytes).into_bytes(),
        }
    }

    pub fn decode(self, bytes: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
        match self {
            Encoding::Identity => Ok(bytes),
            Encoding::WebSafe => {
                let text = std::str::from_utf8(&bytes)
                    .map_err(|_| CryptoError::Encoding("encoded output is not UTF-8".into()))?;
                decode_web_safe(text)
            }
        }
    }
}

/// Outer envelope encoding of a simple artifact
pub fn wrap(bytes: &[u8]) -> String {
    encode_web_safe(bytes)
}

pub fn unwrap(text: &str) -> Result<Vec<u8>, CryptoError> {
    decode_web_safe(text)
}
