//! Error types for tubes.
//!
//! Every capability trait and workflow returns [`Result`], so a failing step
//! hands its error to the caller unchanged through `?`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Rejected user input. Raised before any side effect.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid name: must match pattern {pattern}")]
    InvalidName { pattern: &'static str },

    #[error("invalid config key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },
}

/// Problems assembling the runtime configuration from flags and env vars.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("specify one command of: down, show or up")]
    NoCommand,

    #[error("missing required flag name")]
    MissingName,

    #[error("missing one or more AWS config options/env vars")]
    MissingAwsConfig,

    #[error("invalid endpoint overrides: {0}")]
    InvalidEndpoints(#[source] serde_json::Error),

    #[error("state directory not found: {path}: {source}")]
    StateDirNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state directory not a directory: {0}")]
    StateDirNotDirectory(PathBuf),
}

/// Local config store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("state directory must be empty")]
    NotEmpty,

    #[error("config key not found: {0}")]
    NotFound(String),

    #[error("failed to read {key}: {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {key}: {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list state directory {path}: {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Cloud control plane failures.
#[derive(Error, Debug)]
pub enum CloudError {
    /// Provider error, message passed through untouched.
    #[error("{0}")]
    Api(String),

    #[error("keypair already exists: {0}")]
    KeyPairExists(String),

    #[error("no image matches filter {0}")]
    NoMatchingImage(String),

    #[error("stack {stack} is missing expected resource {logical_id}")]
    MissingResource { stack: String, logical_id: String },

    #[error("stack {stack} finished in unhealthy state {status}")]
    StackUnhealthy { stack: String, status: String },

    #[error("timed out after {elapsed:?} waiting for stack {stack} (last status {status})")]
    Timeout {
        stack: String,
        elapsed: Duration,
        status: String,
    },

    #[error("malformed ARN {0:?}")]
    MalformedArn(String),

    #[error("failed to start AWS runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Manifest rendering failures.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to render manifest: {0}")]
    Render(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
