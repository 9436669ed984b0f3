mod common;

use common::{roundtrip, roundtrip_data};
use keystone_test_utils::fixtures::data::{EMPTY, HELLO, UNICODE};
use keystone_test_utils::{init_test_logging, TestKeysets, CRYPTED_KEY_SET, PUBLIC_SUFFIX};
use serde_json::json;

const SIGN_OPERATIONS: [&str; 3] = ["unversioned", "attached", "sign"];

#[test]
fn sign_operations_with_symmetric_keys() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    for operation in SIGN_OPERATIONS {
        for encoding in ["encoded", "unencoded"] {
            for class in ["signer", "verifier"] {
                let generate = json!({"encoding": encoding, "cryptedKeySet": ""});
                let test = json!({"class": class});
                roundtrip(keys.path(), operation, "hmac", &generate, &test)
                    .unwrap_or_else(|e| panic!("{operation}/{encoding}/{class}: {e}"));
            }
        }
    }
}

#[test]
fn sign_operations_with_asymmetric_keys() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    for operation in SIGN_OPERATIONS {
        for algorithm in ["dsa", "ecdsa"] {
            let generate = json!({"encoding": "encoded", "cryptedKeySet": ""});
            for test in [
                json!({"class": "signer"}),
                json!({"class": "verifier"}),
                json!({"class": "verifier", "pubKey": PUBLIC_SUFFIX}),
            ] {
                roundtrip(keys.path(), operation, algorithm, &generate, &test)
                    .unwrap_or_else(|e| panic!("{operation}/{algorithm}/{test}: {e}"));
            }
        }
    }
}

#[test]
fn sign_operations_with_encrypted_key_sets() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    for operation in SIGN_OPERATIONS {
        for algorithm in ["hmac", "dsa"] {
            let generate = json!({"encoding": "unencoded", "cryptedKeySet": CRYPTED_KEY_SET});
            let test = json!({"class": "verifier"});
            roundtrip(keys.path(), operation, algorithm, &generate, &test)
                .unwrap_or_else(|e| panic!("{operation}/{algorithm}: {e}"));
        }
    }
}

#[test]
fn encrypt_with_every_crypt_key_set() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    for algorithm in ["aes", "chacha", "x25519"] {
        for class in ["crypter", "encrypter"] {
            for encoding in ["encoded", "unencoded"] {
                let generate = json!({"encoding": encoding, "cryptedKeySet": "", "class": class});
                roundtrip(keys.path(), "encrypt", algorithm, &generate, &json!({}))
                    .unwrap_or_else(|e| panic!("{algorithm}/{class}/{encoding}: {e}"));
            }
        }
    }
}

#[test]
fn encrypt_with_public_key_decrypts_with_private() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    let generate = json!({
        "encoding": "encoded",
        "cryptedKeySet": "",
        "class": "encrypter",
        "pubKey": PUBLIC_SUFFIX,
    });
    roundtrip(keys.path(), "encrypt", "x25519", &generate, &json!({})).unwrap();
}

#[test]
fn encrypt_with_encrypted_key_set() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    let generate = json!({
        "encoding": "encoded",
        "cryptedKeySet": CRYPTED_KEY_SET,
        "class": "crypter",
    });
    roundtrip(keys.path(), "encrypt", "x25519", &generate, &json!({})).unwrap();
}

#[test]
fn signed_session_with_each_signer() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    for signer in ["hmac", "dsa", "ecdsa"] {
        let generate = json!({"cryptedKeySet": "", "signer": signer});
        roundtrip(keys.path(), "signedSession", "x25519", &generate, &json!({}))
            .unwrap_or_else(|e| panic!("{signer}: {e}"));
    }
}

#[test]
fn signed_session_encrypts_to_public_key() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    let generate = json!({"cryptedKeySet": "", "signer": "dsa", "pubKey": PUBLIC_SUFFIX});
    roundtrip(keys.path(), "signedSession", "x25519", &generate, &json!({})).unwrap();
}

#[test]
fn signed_session_with_symmetric_key_encrypter() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    let generate = json!({"cryptedKeySet": "", "signer": "ecdsa"});
    roundtrip(keys.path(), "signedSession", "aes", &generate, &json!({})).unwrap();
}

#[test]
fn signed_session_with_encrypted_key_sets() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    let generate = json!({"cryptedKeySet": CRYPTED_KEY_SET, "signer": "dsa"});
    roundtrip(keys.path(), "signedSession", "x25519", &generate, &json!({})).unwrap();
}

#[test]
fn every_operation_handles_empty_and_non_ascii_data() {
    init_test_logging();
    let keys = TestKeysets::standard().unwrap();

    let cases = [
        (
            "sign",
            "dsa",
            json!({"encoding": "encoded", "cryptedKeySet": ""}),
            json!({"class": "verifier", "pubKey": PUBLIC_SUFFIX}),
        ),
        (
            "unversioned",
            "hmac",
            json!({"encoding": "unencoded", "cryptedKeySet": ""}),
            json!({"class": "verifier"}),
        ),
        (
            "attached",
            "ecdsa",
            json!({"encoding": "encoded", "cryptedKeySet": ""}),
            json!({"class": "signer"}),
        ),
        (
            "encrypt",
            "x25519",
            json!({
                "encoding": "encoded",
                "cryptedKeySet": "",
                "class": "encrypter",
                "pubKey": PUBLIC_SUFFIX,
            }),
            json!({}),
        ),
        (
            "signedSession",
            "x25519",
            json!({"cryptedKeySet": "", "signer": "dsa"}),
            json!({}),
        ),
    ];

    for (operation, algorithm, generate, test) in &cases {
        for data in [HELLO, EMPTY, UNICODE] {
            roundtrip_data(keys.path(), operation, algorithm, generate, test, data)
                .unwrap_or_else(|e| panic!("{operation}/{algorithm} with {data:?}: {e}"));
        }
    }
}
