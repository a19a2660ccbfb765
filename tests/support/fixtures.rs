//! Test fixtures and constants.

/// A real PKCS#1 RSA private key, as EC2 hands it out.
pub const SSH_KEY_PEM: &[u8] = include_bytes!("../fixtures/ssh-key.pem");

/// Image id the fake cloud reports for the NAT box.
pub const FAKE_AMI: &str = "some-nat-box-ami-id";

/// IAM user the fake base stack reports for the director.
pub const FAKE_BOSH_USER: &str = "some-bosh-user";

/// Environment name used by most tests.
pub const ENV_NAME: &str = "some-env";

/// Progress lines of a successful boot.
pub const BOOT_LOG: &[&str] = &[
    "Creating keypair",
    "Looking for latest AWS NAT box AMI...",
    "Latest NAT box AMI is \"some-nat-box-ami-id\"",
    "Upserting stack...",
    "Stack update complete",
    "Generating BOSH init manifest",
    "Finished",
];

/// Progress lines of a successful destroy.
pub const DESTROY_LOG: &[&str] = &[
    "Deleting stack...",
    "Delete complete",
    "Deleting keypair",
    "Finished",
];

/// Names the validator must reject.
pub const INVALID_NAMES: &[&str] = &[
    "",
    "invalid_name",
    "1starts-with-digit",
    "-leading-dash",
    "has space",
    "dot.ted",
    "slash/name",
];

/// Offline AWS settings for the binary. Never reaches a real endpoint in
/// the paths the CLI tests exercise.
pub const FAKE_AWS_ENV: &[(&str, &str)] = &[
    ("AWS_DEFAULT_REGION", "us-west-2"),
    ("AWS_ACCESS_KEY_ID", "some-access-key-id"),
    ("AWS_SECRET_ACCESS_KEY", "some-secret-access-key"),
];
