//! Tear an environment down.

use tracing::info;

use super::Orchestrator;
use crate::core::cloud::StatusClassifier;
use crate::core::validation::validate_name;
use crate::error::Result;

impl Orchestrator<'_> {
    /// Delete the base stack, wait for it to disappear, then delete the
    /// keypair.
    ///
    /// Resources that are already gone are skipped, so re-running after a
    /// partial teardown is safe. The local state directory is left alone.
    pub fn destroy(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        info!(environment = name, "destroying environment");

        self.say("Deleting stack...")?;
        self.cloud.delete_stack(name)?;
        self.cloud.wait_for_stack(name, StatusClassifier::Delete)?;
        self.say("Delete complete")?;

        self.say("Deleting keypair")?;
        self.cloud.delete_key_pair(name)?;

        self.say("Finished")
    }
}
