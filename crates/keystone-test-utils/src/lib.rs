pub mod fixtures;

pub use fixtures::{standard_commands, TestKeysets, CRYPTED_KEY_SET, PUBLIC_SUFFIX};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("keystone_interop=debug,keystone_crypto=debug,keystone_keytool=info")
            }))
            .with_test_writer()
            .init();
    });
}
