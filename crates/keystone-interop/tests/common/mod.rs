#![allow(dead_code)]

use keystone_interop::{execute, Command, InteropError, Outcome};
use serde_json::{json, Value};
use std::path::Path;

pub fn generate(
    keys: &Path,
    operation: &str,
    algorithm: &str,
    generate_options: &Value,
    test_data: &str,
) -> Result<Value, InteropError> {
    let request = json!({
        "command": "generate",
        "operation": operation,
        "keyPath": keys,
        "algorithm": algorithm,
        "generateOptions": generate_options,
        "testData": test_data,
    });
    match execute(Command::parse(&request.to_string())?)? {
        Outcome::Generated(artifact) => Ok(artifact.to_value()),
        other => panic!("generate returned {other:?}"),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn test(
    keys: &Path,
    operation: &str,
    output: &Value,
    algorithm: &str,
    generate_options: &Value,
    test_options: &Value,
    test_data: &str,
) -> Result<(), InteropError> {
    let request = json!({
        "command": "test",
        "operation": operation,
        "output": output,
        "keyPath": keys,
        "algorithm": algorithm,
        "generateOptions": generate_options,
        "testOptions": test_options,
        "testData": test_data,
    });
    match execute(Command::parse(&request.to_string())?)? {
        Outcome::Passed => Ok(()),
        other => panic!("test returned {other:?}"),
    }
}

/// Generate with `generate_options`, then test the artifact
pub fn roundtrip(
    keys: &Path,
    operation: &str,
    algorithm: &str,
    generate_options: &Value,
    test_options: &Value,
) -> Result<(), InteropError> {
    let data = keystone_test_utils::fixtures::data::HELLO;
    roundtrip_data(keys, operation, algorithm, generate_options, test_options, data)
}

pub fn roundtrip_data(
    keys: &Path,
    operation: &str,
    algorithm: &str,
    generate_options: &Value,
    test_options: &Value,
    data: &str,
) -> Result<(), InteropError> {
    let output = generate(keys, operation, algorithm, generate_options, data)?;
    test(keys, operation, &output, algorithm, generate_options, test_options, data)
}
