use keystone_test_utils::{TestKeysets, PUBLIC_SUFFIX};
use serde_json::{json, Value};
use std::process::{Command, Output};

fn interop() -> Command {
    Command::new(env!("CARGO_BIN_EXE_keystone-interop"))
}

fn run(request: &Value) -> Output {
    interop().arg(request.to_string()).output().unwrap()
}

#[test]
fn generate_then_test_across_processes() {
    let keys = TestKeysets::standard().unwrap();
    let generate_options = json!({"encoding": "encoded", "cryptedKeySet": ""});

    let generated = run(&json!({
        "command": "generate",
        "operation": "sign",
        "keyPath": keys.path(),
        "algorithm": "dsa",
        "generateOptions": generate_options,
        "testData": "hello",
    }));
    assert!(generated.status.success(), "{}", String::from_utf8_lossy(&generated.stderr));
    let output: Value = serde_json::from_slice(&generated.stdout).unwrap();
    assert!(output["output"].is_string());

    let mut request = json!({
        "command": "test",
        "operation": "sign",
        "output": output,
        "keyPath": keys.path(),
        "algorithm": "dsa",
        "generateOptions": generate_options,
        "testOptions": {"class": "verifier", "pubKey": PUBLIC_SUFFIX},
        "testData": "hello",
    });
    let tested = run(&request);
    assert!(tested.status.success(), "{}", String::from_utf8_lossy(&tested.stderr));
    assert_eq!(String::from_utf8_lossy(&tested.stdout).trim(), "Test passes");

    request["testData"] = json!("hallo");
    let failed = run(&request);
    assert_eq!(failed.status.code(), Some(1));
    assert!(failed.stdout.is_empty());
}

#[test]
fn signed_session_across_processes() {
    let keys = TestKeysets::standard().unwrap();
    let generate_options = json!({"cryptedKeySet": "", "signer": "ecdsa", "pubKey": PUBLIC_SUFFIX});

    let generated = run(&json!({
        "command": "generate",
        "operation": "signedSession",
        "keyPath": keys.path(),
        "algorithm": "x25519",
        "generateOptions": generate_options,
        "testData": "session data",
    }));
    assert!(generated.status.success(), "{}", String::from_utf8_lossy(&generated.stderr));
    let output: Value = serde_json::from_slice(&generated.stdout).unwrap();
    assert!(output["sessionMaterial"].is_string());

    let tested = run(&json!({
        "command": "test",
        "operation": "signedSession",
        "output": output,
        "keyPath": keys.path(),
        "algorithm": "x25519",
        "generateOptions": generate_options,
        "testOptions": {},
        "testData": "session data",
    }));
    assert!(tested.status.success(), "{}", String::from_utf8_lossy(&tested.stderr));
}

#[test]
fn request_can_come_from_the_environment() {
    let keys = TestKeysets::new().unwrap();
    let location = keys.keyset_path("aes");
    let request = json!({
        "command": "create",
        "keyczartCommands": [format!("create --location={} --purpose=crypt", location.display())],
    });

    let output = interop()
        .env("KEYSTONE_INTEROP_JSON", request.to_string())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
    assert!(location.join("meta").exists());
}

#[test]
fn exit_codes() {
    let keys = TestKeysets::standard().unwrap();

    let missing = interop().env_remove("KEYSTONE_INTEROP_JSON").output().unwrap();
    assert_eq!(missing.status.code(), Some(2));

    let usage = run(&json!({"command": "launch"}));
    assert_eq!(usage.status.code(), Some(2));

    let unknown = run(&json!({
        "command": "generate",
        "operation": "rot13",
        "keyPath": keys.path(),
        "algorithm": "hmac",
        "generateOptions": {},
        "testData": "hello",
    }));
    assert_eq!(unknown.status.code(), Some(3));

    let no_keys = run(&json!({
        "command": "generate",
        "operation": "sign",
        "keyPath": keys.path(),
        "algorithm": "nothing-here",
        "generateOptions": {"encoding": "encoded", "cryptedKeySet": ""},
        "testData": "hello",
    }));
    assert_eq!(no_keys.status.code(), Some(4));
    assert!(!no_keys.stderr.is_empty());
}
