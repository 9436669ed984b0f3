//! Request envelopes and the dispatcher

use crate::error::InteropError;
use crate::operation::{Artifact, OperationContext, OperationKind};
use crate::options::Options;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

/// One key tool invocation, as a command line or as separate arguments
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeytoolCommand {
    Line(String),
    Args(Vec<String>),
}

impl KeytoolCommand {
    pub fn args(&self) -> Vec<String> {
        match self {
            KeytoolCommand::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            KeytoolCommand::Args(args) => args.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    Create {
        #[serde(rename = "keyczartCommands")]
        keytool_commands: Vec<KeytoolCommand>,
    },
    #[serde(rename_all = "camelCase")]
    Generate {
        operation: String,
        key_path: PathBuf,
        algorithm: String,
        generate_options: Options,
        test_data: String,
    },
    #[serde(rename_all = "camelCase")]
    Test {
        operation: String,
        output: Value,
        key_path: PathBuf,
        algorithm: String,
        generate_options: Options,
        test_options: Options,
        test_data: String,
    },
}

impl Command {
    /// Parse a JSON request; anything malformed is a usage error
    pub fn parse(json: &str) -> Result<Self, InteropError> {
        serde_json::from_str(json).map_err(|e| InteropError::usage(format!("invalid request: {e}")))
    }
}

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { commands: usize },
    Generated(Artifact),
    Passed,
}

impl Outcome {
    /// Line to print on stdout, if any
    pub fn report(&self) -> Option<String> {
        match self {
            Outcome::Created { .. } => None,
            Outcome::Generated(artifact) => Some(artifact.to_json()),
            Outcome::Passed => Some("Test passes".to_string()),
        }
    }
}

pub fn execute(command: Command) -> Result<Outcome, InteropError> {
    match command {
        Command::Create { keytool_commands } => {
            for command in &keytool_commands {
                let args = command.args();
                debug!(?args, "running key tool");
                keystone_keytool::run_args(args)?;
            }
            info!(commands = keytool_commands.len(), "created key sets");
            Ok(Outcome::Created {
                commands: keytool_commands.len(),
            })
        }
        Command::Generate {
            operation,
            key_path,
            algorithm,
            generate_options,
            test_data,
        } => {
            let kind: OperationKind = operation.parse()?;
            let operation = kind.build(OperationContext::new(key_path, test_data));
            let artifact = operation.generate(&algorithm, &generate_options)?;
            Ok(Outcome::Generated(artifact))
        }
        Command::Test {
            operation,
            output,
            key_path,
            algorithm,
            generate_options,
            test_options,
            test_data,
        } => {
            let kind: OperationKind = operation.parse()?;
            let artifact = kind.read_artifact(&output)?;
            let operation = kind.build(OperationContext::new(key_path, test_data));
            operation.test(&artifact, &algorithm, &generate_options, &test_options)?;
            info!(operation = %kind, algorithm, "test passed");
            Ok(Outcome::Passed)
        }
    }
}
