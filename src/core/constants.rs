//! Constants used throughout tubes.
//!
//! Centralizes reserved store keys, stack parameters, and wait defaults.

use std::time::Duration;

/// Config store key holding the SSH private key (PEM).
pub const SSH_KEY: &str = "ssh-key";

/// Config store key holding the generated BOSH director manifest.
pub const DIRECTOR_MANIFEST: &str = "director.yml";

/// Default state directory, relative to the working directory.
pub const ENVIRONMENTS_DIR: &str = "environments";

/// Base stack parameter receiving the NAT box AMI id.
pub const NAT_AMI_PARAM: &str = "NATInstanceAMI";

/// Base stack parameter receiving the keypair name.
pub const KEY_NAME_PARAM: &str = "KeyName";

/// Default deadline for a stack to settle.
pub const DEFAULT_STACK_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default delay between stack status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Length of generated director passwords.
pub const CREDENTIAL_LENGTH: usize = 12;
