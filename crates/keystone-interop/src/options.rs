//! Free-form option maps carried by generate and test requests

use crate::codec::Encoding;
use crate::error::InteropError;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    /// A string option that must be present
    pub fn required(&self, key: &str) -> Result<&str, InteropError> {
        match self.0.get(key) {
            Some(Value::String(value)) => Ok(value),
            Some(other) => Err(InteropError::usage(format!(
                "option \"{key}\" must be a string, got {other}"
            ))),
            None => Err(InteropError::usage(format!("missing option \"{key}\""))),
        }
    }

    /// A string option defaulting to the empty string
    pub fn optional(&self, key: &str) -> Result<&str, InteropError> {
        if self.0.contains_key(key) {
            self.required(key)
        } else {
            Ok("")
        }
    }

    pub fn encoding(&self) -> Result<Encoding, InteropError> {
        self.required("encoding").map(Encoding::from_option)
    }

    /// Name of the key set wrapping the requested one, empty for none
    pub fn crypted_key_set(&self) -> Result<&str, InteropError> {
        self.required("cryptedKeySet")
    }

    /// Suffix selecting an exported public key set
    pub fn pub_key(&self) -> Result<&str, InteropError> {
        self.optional("pubKey")
    }

    pub fn class(&self) -> Result<&str, InteropError> {
        self.required("class")
    }

    /// Signing key set algorithm for signed sessions
    pub fn signer(&self) -> Result<&str, InteropError> {
        self.required("signer")
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
