//! Bring up a new environment.

use std::collections::BTreeMap;

use tracing::info;

use super::Orchestrator;
use crate::core::cloud::{ImageFilter, StatusClassifier, BASE_STACK_TEMPLATE};
use crate::core::constants::{DIRECTOR_MANIFEST, KEY_NAME_PARAM, NAT_AMI_PARAM, SSH_KEY};
use crate::core::validation::validate_name;
use crate::error::{Result, StoreError};

impl Orchestrator<'_> {
    /// Provision the environment `name`.
    ///
    /// Steps, in order: keypair (private key stored under `ssh-key`), NAT
    /// box AMI lookup, base stack upsert, wait for the stack, resource
    /// discovery, director access key, manifest (stored under
    /// `director.yml`).
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidName` before anything else happens.
    /// - `StoreError::NotEmpty` if the store already holds state; no cloud
    ///   call is made in that case.
    /// - Otherwise the first failing step's error. A failure after the
    ///   keypair exists leaves it behind, and a retry will hit
    ///   `CloudError::KeyPairExists` until it is removed.
    pub fn boot(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;

        if !self.store.is_empty()? {
            return Err(StoreError::NotEmpty.into());
        }
        info!(environment = name, "booting environment");

        self.say("Creating keypair")?;
        let pem = self.cloud.create_key_pair(name)?;
        self.store.set(SSH_KEY, &pem)?;

        self.say("Looking for latest AWS NAT box AMI...")?;
        let ami = self.cloud.latest_image_id(&ImageFilter::nat_box())?;
        self.say(&format!("Latest NAT box AMI is {ami:?}"))?;

        self.say("Upserting stack...")?;
        let parameters = BTreeMap::from([
            (NAT_AMI_PARAM.to_string(), ami),
            (KEY_NAME_PARAM.to_string(), name.to_string()),
        ]);
        self.cloud.upsert_stack(name, BASE_STACK_TEMPLATE, &parameters)?;
        self.cloud.wait_for_stack(name, StatusClassifier::Upsert)?;
        self.say("Stack update complete")?;

        let resources = self.cloud.stack_resources(name)?;
        let access_key = self.cloud.create_access_key(&resources.bosh_user)?;

        self.say("Generating BOSH init manifest")?;
        let manifest = self.manifests.build(name, &resources, &access_key)?;
        self.store.set(DIRECTOR_MANIFEST, &manifest)?;

        info!(environment = name, "environment ready");
        self.say("Finished")
    }
}
