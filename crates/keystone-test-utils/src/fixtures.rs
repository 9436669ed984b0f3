use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Suffix of exported public key sets, passed as the `pubKey` option
pub const PUBLIC_SUFFIX: &str = ".public";

/// Wrapping key set for the encrypted variants, passed as `cryptedKeySet`
pub const CRYPTED_KEY_SET: &str = "aes";

fn arg(name: &str, value: impl AsRef<Path>) -> String {
    format!("--{name}={}", value.as_ref().display())
}

fn plain_set(root: &Path, name: &str, purpose: &str, extra: &[&str]) -> Vec<Vec<String>> {
    let location = root.join(name);
    let mut create = vec![
        "create".to_string(),
        arg("location", &location),
        format!("--purpose={purpose}"),
    ];
    let mut addkey = vec![
        "addkey".to_string(),
        arg("location", &location),
        "--status=primary".to_string(),
    ];
    for flag in extra {
        if flag.starts_with("--asymmetric") {
            create.push(flag.to_string());
        } else {
            addkey.push(flag.to_string());
        }
    }
    vec![create, addkey]
}

fn public_export(root: &Path, name: &str) -> Vec<String> {
    vec![
        "pubkey".to_string(),
        arg("location", root.join(name)),
        arg("destination", root.join(format!("{name}{PUBLIC_SUFFIX}"))),
    ]
}

/// Key tool invocations that build the standard interop key sets under `root`.
///
/// Plain sets: `hmac`, `dsa` (Ed25519), `ecdsa`, `aes`, `chacha`, `x25519`,
/// with `.public` exports of the asymmetric ones. Encrypted sets wrapped by
/// `aes`: `hmacaes`, `dsaaes`, `x25519aes`.
pub fn standard_commands(root: &Path) -> Vec<Vec<String>> {
    let mut commands = Vec::new();
    commands.extend(plain_set(root, "hmac", "sign", &[]));
    commands.extend(plain_set(root, "dsa", "sign", &["--asymmetric=ed25519"]));
    commands.extend(plain_set(root, "ecdsa", "sign", &["--asymmetric=ecdsa"]));
    commands.extend(plain_set(root, "aes", "crypt", &[]));
    commands.extend(plain_set(root, "chacha", "crypt", &["--cipher=chacha20-poly1305"]));
    commands.extend(plain_set(root, "x25519", "crypt", &["--asymmetric=x25519"]));
    for name in ["dsa", "ecdsa", "x25519"] {
        commands.push(public_export(root, name));
    }

    let crypter = arg("crypter", root.join(CRYPTED_KEY_SET));
    for (name, purpose, asymmetric) in [
        ("hmac", "sign", None),
        ("dsa", "sign", Some("--asymmetric=ed25519")),
        ("x25519", "crypt", Some("--asymmetric=x25519")),
    ] {
        let mut extra = vec![crypter.as_str()];
        extra.extend(asymmetric);
        let crypted = format!("{name}{CRYPTED_KEY_SET}");
        commands.extend(plain_set(root, &crypted, purpose, &extra));
    }
    commands
}

/// Temporary directory of key sets, removed on drop
pub struct TestKeysets {
    temp_dir: TempDir,
}

impl TestKeysets {
    /// Empty key directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Key directory populated with [`standard_commands`]
    pub fn standard() -> Result<Self> {
        let keysets = Self::new()?;
        for command in standard_commands(keysets.path()) {
            keysets.keytool(&command)?;
        }
        Ok(keysets)
    }

    pub fn keytool(&self, args: &[String]) -> Result<()> {
        keystone_keytool::run_args(args).with_context(|| format!("keytool {args:?}"))
    }

    pub fn keyset_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

// Common test data
pub mod data {
    pub const HELLO: &str = "This is some test data";

    pub const UNICODE: &str = "🦀 Rust 日本語 العربية";

    pub const EMPTY: &str = "";
}
