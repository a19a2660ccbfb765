//! Input validation for tubes operations.
//!
//! The environment name doubles as the stack name, the keypair name and the
//! default state directory, so it is held to CloudFormation's stack name rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, ValidationError};

/// Accepted environment names.
pub const NAME_PATTERN: &str = "^[a-zA-Z][-a-zA-Z0-9]*$";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"));

/// Validate an environment name.
///
/// # Errors
///
/// Returns `ValidationError::InvalidName` if `name` does not match
/// [`NAME_PATTERN`].
pub fn validate_name(name: &str) -> Result<()> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidName {
            pattern: NAME_PATTERN,
        }
        .into())
    }
}

/// Validate a config store key.
///
/// Keys are flat file names: no separators, no traversal, never empty.
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "empty"
    } else if key == "." || key == ".." {
        "reserved"
    } else if key.contains(['/', '\\', '\0']) {
        "must not contain path separators"
    } else {
        return Ok(());
    };

    Err(ValidationError::InvalidKey {
        key: key.to_string(),
        reason,
    }
    .into())
}
