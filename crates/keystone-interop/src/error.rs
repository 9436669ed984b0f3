use keystone_crypto::CryptoError;
use keystone_keytool::KeytoolError;
use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "\
Interop tests take a single JSON string describing the parameters

The format of the JSON is as follows:
{
  \"command\" : (\"create\"|\"generate\"|\"test\"),
  ... any command specific arguments ...
}";

#[derive(Error, Debug)]
pub enum InteropError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Cannot open key set {}: {source}", path.display())]
    KeyAccess {
        path: PathBuf,
        #[source]
        source: CryptoError,
    },

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Generation failed: {0}")]
    Generation(#[source] CryptoError),

    #[error("Key tool command failed: {0}")]
    Keytool(#[from] KeytoolError),
}

impl InteropError {
    pub fn usage(message: impl Into<String>) -> Self {
        InteropError::Usage(message.into())
    }

    /// Wrap a toolkit failure met while checking an artifact
    pub fn verification(source: CryptoError) -> Self {
        InteropError::Verification(source.to_string())
    }

    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            InteropError::Verification(_) => 1,
            InteropError::Usage(_) => 2,
            InteropError::Keytool(KeytoolError::Usage(_)) => 2,
            InteropError::UnknownOperation(_) => 3,
            InteropError::KeyAccess { .. } => 4,
            InteropError::Generation(_) | InteropError::Keytool(_) => 5,
        }
    }
}
