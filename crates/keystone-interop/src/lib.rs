//! Cross-implementation interoperability harness for Keystone
//!
//! One process generates a cryptographic artifact from a JSON request, a
//! second (possibly another implementation) checks it. Five operations are
//! supported: `unversioned`, `attached`, `sign`, `encrypt` and
//! `signedSession`.

pub mod access;
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod operation;
pub mod options;

pub use access::{KeyAccess, Role};
pub use codec::Encoding;
pub use command::{execute, Command, KeytoolCommand, Outcome};
pub use error::InteropError;
pub use operation::{
    Artifact, EncrypterClass, Operation, OperationContext, OperationKind, VerifierClass,
};
pub use options::Options;
