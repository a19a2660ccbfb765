//! The provisioning workflows.
//!
//! [`Orchestrator`] sequences cloud and config store calls into `boot`,
//! `destroy` and `show`. Each workflow is fail-fast: the first failing step
//! ends the run and its error is returned unchanged. Completed steps are not
//! undone.

mod boot;
mod destroy;

use std::io::Write;

use crate::core::cloud::CloudProvider;
use crate::core::constants::SSH_KEY;
use crate::core::manifest::ManifestBuilder;
use crate::core::store::ConfigStore;
use crate::core::validation::validate_name;
use crate::error::Result;

/// Drives one environment's workflows.
///
/// Progress lines go to `log`, one per line, only once the step they
/// announce has been reached.
pub struct Orchestrator<'a> {
    cloud: &'a dyn CloudProvider,
    store: &'a dyn ConfigStore,
    manifests: &'a dyn ManifestBuilder,
    log: &'a mut dyn Write,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        cloud: &'a dyn CloudProvider,
        store: &'a dyn ConfigStore,
        manifests: &'a dyn ManifestBuilder,
        log: &'a mut dyn Write,
    ) -> Self {
        Self {
            cloud,
            store,
            manifests,
            log,
        }
    }

    /// Write the SSH private key of environment `name` to `out`.
    ///
    /// Store and write errors are returned as they are.
    pub fn show(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        validate_name(name)?;
        let pem = self.store.get(SSH_KEY)?;
        out.write_all(&pem)?;
        out.flush()?;
        Ok(())
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.log, "{line}")?;
        Ok(())
    }
}
