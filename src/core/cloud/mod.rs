//! Cloud control plane access.
//!
//! [`CloudProvider`] is the narrow capability the orchestrator drives. The
//! AWS implementation lives in [`aws`]; tests substitute fakes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use zeroize::Zeroizing;

use crate::error::{CloudError, Result};

mod arn;
pub mod aws;
mod image;
mod pundit;
pub mod wait;

pub use arn::Arn;
pub use aws::AwsClient;
pub use image::{latest_image, Image, ImageFilter};
pub use pundit::{StatusClassifier, STACK_NOT_FOUND};
pub use wait::{poll_stack, Clock, SystemClock, WaitPolicy};

/// CloudFormation template for the base stack.
pub const BASE_STACK_TEMPLATE: &str = include_str!("templates/base-stack.json");

/// Logical IDs in the base stack that the director manifest depends on.
pub mod logical_ids {
    pub const VPC: &str = "VPC";
    pub const BOSH_SUBNET: &str = "BOSHSubnet";
    pub const BOSH_SECURITY_GROUP: &str = "BOSHSecurityGroup";
    pub const BOSH_USER: &str = "BOSHDirectorUser";
    pub const NAT_INSTANCE: &str = "NATInstance";
}

/// Operations against the cloud control plane.
///
/// All calls block until the provider answers. Errors from the provider are
/// returned as-is; nothing here retries.
pub trait CloudProvider {
    /// Id of the newest image matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `CloudError::NoMatchingImage` if nothing matches.
    fn latest_image_id(&self, filter: &ImageFilter) -> Result<String>;

    /// Create the stack if absent, else update it in place.
    fn upsert_stack(
        &self,
        name: &str,
        template: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<()>;

    /// Block until `classifier` calls the stack complete.
    ///
    /// # Errors
    ///
    /// `CloudError::StackUnhealthy` if it completes badly,
    /// `CloudError::Timeout` if the deadline passes first.
    fn wait_for_stack(&self, name: &str, classifier: StatusClassifier) -> Result<()>;

    /// Delete the stack. A stack that is already gone is not an error.
    fn delete_stack(&self, name: &str) -> Result<()>;

    /// Resolve the base stack's resources.
    ///
    /// # Errors
    ///
    /// `CloudError::MissingResource` if an expected logical ID is absent.
    fn stack_resources(&self, name: &str) -> Result<StackResources>;

    /// Create an SSH keypair and return its private key as PEM.
    ///
    /// # Errors
    ///
    /// `CloudError::KeyPairExists` if the name is taken. The private key is
    /// only ever returned here.
    fn create_key_pair(&self, name: &str) -> Result<Zeroizing<Vec<u8>>>;

    /// Delete the keypair. A keypair that is already gone is not an error.
    fn delete_key_pair(&self, name: &str) -> Result<()>;

    /// Create a fresh access key for an IAM user.
    fn create_access_key(&self, user_name: &str) -> Result<AccessKey>;
}

/// Resources of the base stack, keyed out of its generic resource list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackResources {
    pub account_id: String,
    pub region: String,
    pub vpc_id: String,
    pub bosh_subnet_id: String,
    pub bosh_availability_zone: String,
    pub bosh_security_group: String,
    pub bosh_user: String,
    pub nat_instance_id: String,
}

impl StackResources {
    /// Build the bundle from logical → physical ID pairs.
    ///
    /// `stack_arn` supplies the account and region; the availability zone
    /// is looked up by the caller once the subnet is known, so it starts
    /// out empty.
    pub fn from_physical_ids(
        stack: &str,
        stack_arn: &Arn,
        physical_ids: &HashMap<String, String>,
    ) -> Result<Self> {
        let lookup = |logical_id: &str| {
            physical_ids.get(logical_id).cloned().ok_or_else(|| {
                CloudError::MissingResource {
                    stack: stack.to_string(),
                    logical_id: logical_id.to_string(),
                }
            })
        };

        Ok(Self {
            account_id: stack_arn.account_id.clone(),
            region: stack_arn.region.clone(),
            vpc_id: lookup(logical_ids::VPC)?,
            bosh_subnet_id: lookup(logical_ids::BOSH_SUBNET)?,
            bosh_availability_zone: String::new(),
            bosh_security_group: lookup(logical_ids::BOSH_SECURITY_GROUP)?,
            bosh_user: lookup(logical_ids::BOSH_USER)?,
            nat_instance_id: lookup(logical_ids::NAT_INSTANCE)?,
        })
    }
}

/// A freshly minted IAM access key.
pub struct AccessKey {
    pub id: String,
    pub secret: Zeroizing<String>,
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
