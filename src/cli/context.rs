//! Wiring from command-line options to live collaborators.

use std::io;
use std::time::Duration;

use tracing::debug;

use super::Cli;
use crate::core::cloud::{AwsClient, WaitPolicy};
use crate::core::config::{resolve_state_dir, AwsConfig};
use crate::core::manifest::DirectorManifestBuilder;
use crate::core::orchestrator::Orchestrator;
use crate::core::store::Filesystem;
use crate::core::validation::validate_name;
use crate::error::{ConfigError, Result};

/// Everything one invocation needs to act on an environment.
pub struct Context {
    name: String,
    cloud: AwsClient,
    store: Filesystem,
    manifests: DirectorManifestBuilder,
}

impl Context {
    /// Build the context.
    ///
    /// The name is checked before the state directory is touched, so a bad
    /// name leaves nothing behind.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let name = cli
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingName)?;
        validate_name(&name)?;

        let aws = AwsConfig::new(
            cli.aws.region.clone(),
            cli.aws.access_key.clone(),
            cli.aws.secret_key.clone(),
            cli.aws.aws_endpoints.as_deref(),
        )?;
        let policy = WaitPolicy {
            interval: Duration::from_secs(cli.wait.poll_interval),
            timeout: Duration::from_secs(cli.wait.stack_timeout),
        };
        let cloud = AwsClient::new(&aws, policy)?;

        let working_dir = std::env::current_dir()?;
        let store = Filesystem::new(resolve_state_dir(
            cli.state_dir.as_deref(),
            &working_dir,
            &name,
        )?);
        debug!(environment = %name, state_dir = %store.root().display(), ?policy, "context ready");

        Ok(Self {
            name,
            cloud,
            store,
            manifests: DirectorManifestBuilder::default(),
        })
    }

    /// Boot the environment, reporting progress on stderr.
    pub fn up(&self) -> Result<()> {
        let mut log = io::stderr();
        self.orchestrator(&mut log).boot(&self.name)
    }

    /// Destroy the environment, reporting progress on stderr.
    pub fn down(&self) -> Result<()> {
        let mut log = io::stderr();
        self.orchestrator(&mut log).destroy(&self.name)
    }

    /// Print the SSH key on stdout.
    pub fn show(&self) -> Result<()> {
        let mut log = io::stderr();
        let mut out = io::stdout().lock();
        self.orchestrator(&mut log).show(&self.name, &mut out)
    }

    fn orchestrator<'a>(&'a self, log: &'a mut dyn io::Write) -> Orchestrator<'a> {
        Orchestrator::new(&self.cloud, &self.store, &self.manifests, log)
    }
}
