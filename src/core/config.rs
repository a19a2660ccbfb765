//! Runtime configuration.
//!
//! AWS credentials and endpoint overrides, and where an environment's state
//! directory lives. Values arrive from CLI flags or their env var fallbacks.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::ENVIRONMENTS_DIR;
use crate::error::{ConfigError, Result};

/// Credentials and endpoints for the AWS control plane.
#[derive(Clone)]
pub struct AwsConfig {
    pub region: String,
    pub access_key: String,
    pub secret_key: Zeroizing<String>,
    /// Service name (`ec2`, `cloudformation`, `iam`) → endpoint URL.
    pub endpoint_overrides: HashMap<String, String>,
}

impl AwsConfig {
    /// Assemble a config, requiring region and both halves of the key.
    ///
    /// Blank values count as missing.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingAwsConfig` if anything required is absent,
    /// `ConfigError::InvalidEndpoints` if the overrides are not a JSON
    /// object of strings.
    pub fn new(
        region: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        endpoints: Option<&str>,
    ) -> Result<Self> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());

        let endpoint_overrides = parse_endpoint_overrides(endpoints.unwrap_or_default())?;

        match (present(region), present(access_key), present(secret_key)) {
            (Some(region), Some(access_key), Some(secret_key)) => Ok(Self {
                region,
                access_key,
                secret_key: Zeroizing::new(secret_key),
                endpoint_overrides,
            }),
            _ => Err(ConfigError::MissingAwsConfig.into()),
        }
    }

    /// Endpoint override for a service, if one was configured.
    pub fn endpoint(&self, service: &str) -> Option<&str> {
        self.endpoint_overrides.get(service).map(String::as_str)
    }
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("endpoint_overrides", &self.endpoint_overrides)
            .finish()
    }
}

/// Parse a JSON object of service → URL. An empty string means none.
pub fn parse_endpoint_overrides(json: &str) -> Result<HashMap<String, String>> {
    if json.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(json).map_err(|e| ConfigError::InvalidEndpoints(e).into())
}

/// Locate the state directory for an environment.
///
/// An explicit directory must already exist. Otherwise the default
/// `<working_dir>/environments/<name>` is created, private to the user.
pub fn resolve_state_dir(explicit: Option<&Path>, working_dir: &Path, name: &str) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        let metadata = fs::metadata(dir).map_err(|source| ConfigError::StateDirNotFound {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ConfigError::StateDirNotDirectory(dir.to_path_buf()).into());
        }
        return Ok(dir.to_path_buf());
    }

    let dir = working_dir.join(ENVIRONMENTS_DIR).join(name);
    create_private_dir(&dir)?;
    debug!(path = %dir.display(), "using default state directory");
    Ok(dir)
}

fn create_private_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
    }
    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;

    Ok(())
}
