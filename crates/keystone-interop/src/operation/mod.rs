//! Operations the harness can generate and test
//!
//! Every operation follows the same contract: `generate` opens key sets,
//! runs one capability and returns an [`Artifact`]; `test` opens the
//! counterpart role, possibly a different one, and checks the artifact
//! against the same test data. Nothing is kept between the two calls apart
//! from the artifact itself.

mod encrypt;
mod session;
mod sign;

pub use encrypt::EncryptOperation;
pub use session::SignedSessionOperation;
pub use sign::{
    Attached, AttachedSignOperation, SignOperation, SignatureOperation, SignatureScheme,
    Unversioned, UnversionedSignOperation, Versioned,
};

use crate::access::KeyAccess;
use crate::codec;
use crate::error::InteropError;
use crate::options::Options;
use keystone_crypto::CryptoError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub trait Operation {
    /// Produce an artifact with the key set for `algorithm`
    fn generate(&self, algorithm: &str, options: &Options) -> Result<Artifact, InteropError>;

    /// Check an artifact produced by `generate` with `generate_options`
    fn test(
        &self,
        artifact: &Artifact,
        algorithm: &str,
        generate_options: &Options,
        test_options: &Options,
    ) -> Result<(), InteropError>;
}

/// State shared by every operation for one invocation
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub access: KeyAccess,
    pub test_data: Vec<u8>,
}

impl OperationContext {
    pub fn new(key_path: impl Into<PathBuf>, test_data: impl Into<Vec<u8>>) -> Self {
        Self {
            access: KeyAccess::new(key_path),
            test_data: test_data.into(),
        }
    }

    /// Compare recovered plaintext with the test data
    pub fn expect_test_data(&self, recovered: &[u8], what: &str) -> Result<(), InteropError> {
        if recovered == self.test_data.as_slice() {
            Ok(())
        } else {
            Err(InteropError::Verification(format!(
                "{what} does not match the test data"
            )))
        }
    }
}

/// Turn a verifier answer into a verdict
pub(crate) fn verdict(result: Result<bool, CryptoError>, what: &str) -> Result<(), InteropError> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => Err(InteropError::Verification(format!("{what} did not verify"))),
        Err(e) => Err(InteropError::verification(e)),
    }
}

/// Registered operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Unversioned,
    Attached,
    Sign,
    Encrypt,
    SignedSession,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Unversioned,
        OperationKind::Attached,
        OperationKind::Sign,
        OperationKind::Encrypt,
        OperationKind::SignedSession,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Unversioned => "unversioned",
            OperationKind::Attached => "attached",
            OperationKind::Sign => "sign",
            OperationKind::Encrypt => "encrypt",
            OperationKind::SignedSession => "signedSession",
        }
    }

    pub fn build(&self, context: OperationContext) -> Box<dyn Operation> {
        match self {
            OperationKind::Unversioned => Box::new(UnversionedSignOperation::new(context)),
            OperationKind::Attached => Box::new(AttachedSignOperation::new(context)),
            OperationKind::Sign => Box::new(SignOperation::new(context)),
            OperationKind::Encrypt => Box::new(EncryptOperation::new(context)),
            OperationKind::SignedSession => Box::new(SignedSessionOperation::new(context)),
        }
    }

    /// Parse the `output` value of a test request into this operation's artifact.
    ///
    /// Accepts the envelope object as printed by `generate`, or that same
    /// JSON carried as a string.
    pub fn read_artifact(&self, output: &Value) -> Result<Artifact, InteropError> {
        let parsed;
        let envelope = match output {
            Value::String(text) => {
                parsed = serde_json::from_str::<Value>(text)
                    .map_err(|e| InteropError::usage(format!("output is not JSON: {e}")))?;
                &parsed
            }
            other => other,
        };

        match self {
            OperationKind::SignedSession => {
                let envelope: SessionEnvelope = serde_json::from_value(envelope.clone())
                    .map_err(|e| InteropError::usage(format!("bad session output: {e}")))?;
                Ok(Artifact::Session {
                    output: envelope.output,
                    session_material: envelope.session_material,
                })
            }
            _ => {
                let envelope: SimpleEnvelope = serde_json::from_value(envelope.clone())
                    .map_err(|e| InteropError::usage(format!("bad output: {e}")))?;
                let bytes = codec::unwrap(&envelope.output).map_err(InteropError::verification)?;
                Ok(Artifact::Simple(bytes))
            }
        }
    }
}

impl FromStr for OperationKind {
    type Err = InteropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| InteropError::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize)]
struct SimpleEnvelope {
    output: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionEnvelope {
    output: String,
    session_material: String,
}

/// What `generate` hands to a later `test`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Capability output, already passed through the inner encoding
    Simple(Vec<u8>),
    /// Web-safe payload ciphertext plus the opaque session material
    Session {
        output: String,
        session_material: String,
    },
}

impl Artifact {
    pub fn to_value(&self) -> Value {
        match self {
            Artifact::Simple(bytes) => serde_json::json!({ "output": codec::wrap(bytes) }),
            Artifact::Session {
                output,
                session_material,
            } => serde_json::json!({
                "output": output,
                "sessionMaterial": session_material,
            }),
        }
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub(crate) fn simple(&self) -> Result<&[u8], InteropError> {
        match self {
            Artifact::Simple(bytes) => Ok(bytes),
            Artifact::Session { .. } => Err(InteropError::usage(
                "expected a simple output envelope, got a session",
            )),
        }
    }

    pub(crate) fn session(&self) -> Result<(&str, &str), InteropError> {
        match self {
            Artifact::Session {
                output,
                session_material,
            } => Ok((output, session_material)),
            Artifact::Simple(_) => Err(InteropError::usage(
                "expected a session output envelope",
            )),
        }
    }
}

/// Role used to check signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierClass {
    /// Public material only
    Verifier,
    Signer,
}

impl VerifierClass {
    pub fn from_option(class: &str) -> Self {
        if class == "verifier" {
            VerifierClass::Verifier
        } else {
            VerifierClass::Signer
        }
    }
}

/// Role used to produce ciphertexts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncrypterClass {
    Crypter,
    /// Public material only for asymmetric key sets
    Encrypter,
}

impl EncrypterClass {
    pub fn from_option(class: &str) -> Self {
        if class == "crypter" {
            EncrypterClass::Crypter
        } else {
            EncrypterClass::Encrypter
        }
    }
}
