//! Where the request envelope comes from

use crate::error::InteropError;
use std::env;

/// Carries the request when no positional argument is given
pub const ENVELOPE_ENV: &str = "KEYSTONE_INTEROP_JSON";

/// The positional argument, else the environment variable (which is then
/// cleared so child processes do not inherit it)
pub fn resolve_envelope(arg: Option<String>) -> Result<String, InteropError> {
    if let Some(json) = arg {
        return Ok(json);
    }
    match env::var(ENVELOPE_ENV) {
        Ok(json) => {
            env::remove_var(ENVELOPE_ENV);
            Ok(json)
        }
        Err(_) => Err(InteropError::usage(format!(
            "no request given and {ENVELOPE_ENV} is not set"
        ))),
    }
}
