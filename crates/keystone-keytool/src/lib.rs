//! Key set management for Keystone
//!
//! Library half of the `keystone-keytool` binary. The interop harness drives
//! it through [`run_args`] to build the key sets a test matrix needs.

pub mod cli;
pub mod commands;
pub mod writer;

pub use cli::{Cli, Command};
pub use writer::KeysetWriter;

use clap::Parser;
use keystone_crypto::CryptoError;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeytoolError {
    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Key set already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Key set at {} is encrypted; pass --crypter", .0.display())]
    CrypterRequired(PathBuf),

    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Execute an already parsed command
pub fn execute(command: Command) -> Result<(), KeytoolError> {
    match command {
        Command::Create {
            location,
            purpose,
            asymmetric,
            name,
        } => commands::create(&location, purpose, asymmetric, &name),
        Command::Addkey {
            location,
            status,
            size,
            cipher,
            crypter,
        } => commands::addkey(&location, status, size, cipher, crypter.as_deref()).map(|_| ()),
        Command::Pubkey {
            location,
            destination,
            crypter,
        } => commands::pubkey(&location, &destination, crypter.as_deref()),
        Command::Promote { location, version } => {
            commands::promote(&location, version).map(|_| ())
        }
        Command::Demote { location, version } => commands::demote(&location, version).map(|_| ()),
        Command::Revoke { location, version } => commands::revoke(&location, version),
    }
}

/// Parse and execute one command given as arguments without the program name
pub fn run_args<I, T>(args: I) -> Result<(), KeytoolError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv = std::iter::once(OsString::from("keystone-keytool"))
        .chain(args.into_iter().map(Into::into));
    let cli = Cli::try_parse_from(argv)?;
    execute(cli.command)
}
