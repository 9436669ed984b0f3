//! Command line definition for the key tool

use clap::{Parser, Subcommand, ValueEnum};
use keystone_crypto::{CipherAlgorithm, KeyKind, KeyPurpose, KeyStatus};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "keystone-keytool",
    author,
    version,
    about = "Create and manage Keystone key sets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level
    #[arg(long, value_enum, global = true, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty key set
    Create {
        /// Key set directory
        #[arg(long)]
        location: PathBuf,

        #[arg(long, value_enum)]
        purpose: Purpose,

        /// Asymmetric algorithm; symmetric keys are used when omitted
        #[arg(long, value_enum)]
        asymmetric: Option<Asymmetric>,

        #[arg(long, default_value = "")]
        name: String,
    },

    /// Generate a new key version
    Addkey {
        #[arg(long)]
        location: PathBuf,

        #[arg(long, value_enum, default_value = "active")]
        status: Status,

        /// Symmetric key size in bits (128 or 256)
        #[arg(long)]
        size: Option<u32>,

        /// Cipher for symmetric crypt key sets
        #[arg(long, value_enum)]
        cipher: Option<CipherAlgorithm>,

        /// Crypt key set used to encrypt the new key
        #[arg(long)]
        crypter: Option<PathBuf>,
    },

    /// Export the public half of an asymmetric key set
    Pubkey {
        #[arg(long)]
        location: PathBuf,

        #[arg(long)]
        destination: PathBuf,

        /// Crypt key set protecting the source keys
        #[arg(long)]
        crypter: Option<PathBuf>,
    },

    /// Raise a version's status one step
    Promote {
        #[arg(long)]
        location: PathBuf,

        #[arg(long)]
        version: u32,
    },

    /// Lower a version's status one step
    Demote {
        #[arg(long)]
        location: PathBuf,

        #[arg(long)]
        version: u32,
    },

    /// Remove an inactive version
    Revoke {
        #[arg(long)]
        location: PathBuf,

        #[arg(long)]
        version: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Purpose {
    Sign,
    Crypt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Asymmetric {
    Ed25519,
    Ecdsa,
    X25519,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Status {
    Primary,
    Active,
    Inactive,
}

impl From<Status> for KeyStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Primary => KeyStatus::Primary,
            Status::Active => KeyStatus::Active,
            Status::Inactive => KeyStatus::Inactive,
        }
    }
}

/// Purpose and key kind for a `create` invocation
pub fn resolve_kind(purpose: Purpose, asymmetric: Option<Asymmetric>) -> (KeyPurpose, KeyKind) {
    let purpose = match purpose {
        Purpose::Sign => KeyPurpose::SignAndVerify,
        Purpose::Crypt => KeyPurpose::DecryptAndEncrypt,
    };
    // Mismatches such as signing X25519 keys are rejected later by
    // KeysetMetadata::new with a precise error
    let kind = match (purpose, asymmetric) {
        (KeyPurpose::SignAndVerify, None) => KeyKind::HmacSha256,
        (_, None) => KeyKind::Aead,
        (_, Some(Asymmetric::Ed25519)) => KeyKind::Ed25519Priv,
        (_, Some(Asymmetric::Ecdsa)) => KeyKind::EcdsaP256Priv,
        (_, Some(Asymmetric::X25519)) => KeyKind::X25519Priv,
    };
    (purpose, kind)
}
