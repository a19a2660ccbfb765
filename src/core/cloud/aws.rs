//! AWS implementation of [`CloudProvider`].
//!
//! Talks to CloudFormation, EC2 and IAM through the official SDK. The SDK is
//! async; every call is driven to completion on a private current-thread
//! runtime so the rest of tubes stays synchronous.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use aws_config::BehaviorVersion;
use aws_sdk_cloudformation as cloudformation;
use aws_sdk_ec2 as ec2;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_iam as iam;
use tokio::runtime::Runtime;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::{
    latest_image, poll_stack, AccessKey, Arn, Clock, CloudProvider, Image, ImageFilter,
    StackResources, StatusClassifier, SystemClock, WaitPolicy, STACK_NOT_FOUND,
};
use crate::core::config::AwsConfig;
use crate::error::{CloudError, Error, Result};

const CREDENTIALS_PROVIDER: &str = "tubes";

/// CloudFormation/EC2/IAM client.
pub struct AwsClient {
    cloudformation: cloudformation::Client,
    ec2: ec2::Client,
    iam: iam::Client,
    policy: WaitPolicy,
    clock: Box<dyn Clock>,
    // dropped after the clients that run on it
    runtime: Runtime,
}

impl AwsClient {
    /// Build a client from static credentials.
    ///
    /// No request is made until the first operation.
    pub fn new(config: &AwsConfig, policy: WaitPolicy) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CloudError::Runtime)?;

        let credentials = ec2::config::Credentials::new(
            config.access_key.as_str(),
            config.secret_key.as_str(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );
        let shared = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(ec2::config::Region::new(config.region.clone()))
                .credentials_provider(credentials)
                .load(),
        );

        let mut cloudformation_config = cloudformation::config::Builder::from(&shared);
        if let Some(url) = config.endpoint("cloudformation") {
            debug!(service = "cloudformation", url, "overriding endpoint");
            cloudformation_config = cloudformation_config.endpoint_url(url);
        }

        let mut ec2_config = ec2::config::Builder::from(&shared);
        if let Some(url) = config.endpoint("ec2") {
            debug!(service = "ec2", url, "overriding endpoint");
            ec2_config = ec2_config.endpoint_url(url);
        }

        let mut iam_config = iam::config::Builder::from(&shared);
        if let Some(url) = config.endpoint("iam") {
            debug!(service = "iam", url, "overriding endpoint");
            iam_config = iam_config.endpoint_url(url);
        }

        Ok(Self {
            cloudformation: cloudformation::Client::from_conf(cloudformation_config.build()),
            ec2: ec2::Client::from_conf(ec2_config.build()),
            iam: iam::Client::from_conf(iam_config.build()),
            policy,
            clock: Box::new(SystemClock),
            runtime,
        })
    }

    /// Replace the time source used while waiting on stacks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn stack_exists(&self, name: &str) -> Result<bool> {
        Ok(self.stack_status(name)? != STACK_NOT_FOUND)
    }

    fn stack_status(&self, name: &str) -> Result<String> {
        let result = self.block_on(self.cloudformation.describe_stacks().stack_name(name).send());

        match result {
            Ok(output) => Ok(output
                .stacks()
                .first()
                .and_then(|stack| opt(stack.stack_status()))
                .map(|status| status.as_str().to_string())
                .unwrap_or_else(|| STACK_NOT_FOUND.to_string())),
            Err(err) if is_missing(&err) => Ok(STACK_NOT_FOUND.to_string()),
            Err(err) => Err(api_error(err)),
        }
    }

    fn stack_arn(&self, name: &str) -> Result<Arn> {
        let output = self
            .block_on(self.cloudformation.describe_stacks().stack_name(name).send())
            .map_err(api_error)?;

        let stack_id = output
            .stacks()
            .first()
            .and_then(|stack| opt(stack.stack_id()))
            .ok_or_else(|| CloudError::Api(format!("stack {name} has no id")))?;

        stack_id.parse()
    }

    fn subnet_zone(&self, subnet_id: &str) -> Result<String> {
        let output = self
            .block_on(self.ec2.describe_subnets().subnet_ids(subnet_id).send())
            .map_err(api_error)?;

        output
            .subnets()
            .first()
            .and_then(|subnet| subnet.availability_zone())
            .map(str::to_string)
            .ok_or_else(|| CloudError::Api(format!("subnet {subnet_id} has no availability zone")).into())
    }
}

impl CloudProvider for AwsClient {
    fn latest_image_id(&self, filter: &ImageFilter) -> Result<String> {
        let criteria = [
            ("name", &filter.name),
            ("architecture", &filter.architecture),
            ("virtualization-type", &filter.virtualization_type),
            ("root-device-type", &filter.root_device_type),
        ];

        let mut request = self.ec2.describe_images().owners(&filter.owner);
        for (name, value) in criteria {
            request = request.filters(ec2::types::Filter::builder().name(name).values(value).build());
        }

        let output = self.block_on(request.send()).map_err(api_error)?;
        let images: Vec<Image> = output
            .images()
            .iter()
            .map(|image| Image {
                id: image.image_id().unwrap_or_default().to_string(),
                name: image.name().unwrap_or_default().to_string(),
                owner: image
                    .image_owner_alias()
                    .or(image.owner_id())
                    .unwrap_or_default()
                    .to_string(),
                architecture: image
                    .architecture()
                    .map(|a| a.as_str().to_string())
                    .unwrap_or_default(),
                virtualization_type: image
                    .virtualization_type()
                    .map(|v| v.as_str().to_string())
                    .unwrap_or_default(),
                root_device_type: image
                    .root_device_type()
                    .map(|r| r.as_str().to_string())
                    .unwrap_or_default(),
                creation_date: image.creation_date().unwrap_or_default().to_string(),
            })
            .filter(|image| filter.matches(image))
            .collect();
        debug!(candidates = images.len(), filter = %filter, "described images");

        latest_image(&images)
            .map(|image| image.id.clone())
            .ok_or_else(|| CloudError::NoMatchingImage(filter.to_string()).into())
    }

    fn upsert_stack(
        &self,
        name: &str,
        template: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<()> {
        let parameters: Vec<_> = parameters
            .iter()
            .map(|(key, value)| {
                cloudformation::types::Parameter::builder()
                    .parameter_key(key)
                    .parameter_value(value)
                    .build()
            })
            .collect();
        let capability = cloudformation::types::Capability::CapabilityIam;

        if self.stack_exists(name)? {
            info!(stack = name, "updating stack");
            self.block_on(
                self.cloudformation
                    .update_stack()
                    .stack_name(name)
                    .template_body(template)
                    .set_parameters(Some(parameters))
                    .capabilities(capability)
                    .send(),
            )
            .map_err(api_error)?;
        } else {
            info!(stack = name, "creating stack");
            self.block_on(
                self.cloudformation
                    .create_stack()
                    .stack_name(name)
                    .template_body(template)
                    .set_parameters(Some(parameters))
                    .capabilities(capability)
                    .send(),
            )
            .map_err(api_error)?;
        }

        Ok(())
    }

    fn wait_for_stack(&self, name: &str, classifier: StatusClassifier) -> Result<()> {
        poll_stack(name, classifier, &self.policy, self.clock.as_ref(), || {
            self.stack_status(name)
        })
    }

    fn delete_stack(&self, name: &str) -> Result<()> {
        info!(stack = name, "deleting stack");
        match self.block_on(self.cloudformation.delete_stack().stack_name(name).send()) {
            Ok(_) => Ok(()),
            Err(err) if is_missing(&err) => Ok(()),
            Err(err) => Err(api_error(err)),
        }
    }

    fn stack_resources(&self, name: &str) -> Result<StackResources> {
        let output = self
            .block_on(self.cloudformation.describe_stack_resources().stack_name(name).send())
            .map_err(api_error)?;

        let physical_ids: HashMap<String, String> = output
            .stack_resources()
            .iter()
            .filter_map(|resource| {
                let logical = opt(resource.logical_resource_id())?;
                let physical = opt(resource.physical_resource_id())?;
                Some((logical.to_string(), physical.to_string()))
            })
            .collect();
        debug!(stack = name, resources = physical_ids.len(), "described stack resources");

        let arn = self.stack_arn(name)?;
        let mut resources = StackResources::from_physical_ids(name, &arn, &physical_ids)?;
        resources.bosh_availability_zone = self.subnet_zone(&resources.bosh_subnet_id)?;

        Ok(resources)
    }

    fn create_key_pair(&self, name: &str) -> Result<Zeroizing<Vec<u8>>> {
        let output = self
            .block_on(self.ec2.create_key_pair().key_name(name).send())
            .map_err(|err| {
                if err.code() == Some("InvalidKeyPair.Duplicate") {
                    CloudError::KeyPairExists(name.to_string()).into()
                } else {
                    api_error(err)
                }
            })?;

        let material = output
            .key_material()
            .ok_or_else(|| CloudError::Api(format!("keypair {name} returned no key material")))?;

        Ok(Zeroizing::new(material.as_bytes().to_vec()))
    }

    fn delete_key_pair(&self, name: &str) -> Result<()> {
        info!(key_pair = name, "deleting keypair");
        match self.block_on(self.ec2.delete_key_pair().key_name(name).send()) {
            Ok(_) => Ok(()),
            Err(err) if is_missing(&err) => Ok(()),
            Err(err) => Err(api_error(err)),
        }
    }

    fn create_access_key(&self, user_name: &str) -> Result<AccessKey> {
        let output = self
            .block_on(self.iam.create_access_key().user_name(user_name).send())
            .map_err(api_error)?;

        let key = opt(output.access_key())
            .ok_or_else(|| CloudError::Api(format!("no access key returned for {user_name}")))?;

        Ok(AccessKey {
            id: opt(key.access_key_id()).unwrap_or_default().to_string(),
            secret: Zeroizing::new(opt(key.secret_access_key()).unwrap_or_default().to_string()),
        })
    }
}

/// Normalize SDK getters: some return `&T` for required members, others
/// `Option<&T>`.
fn opt<'a, T: ?Sized>(value: impl Into<Option<&'a T>>) -> Option<&'a T> {
    value.into()
}

/// The provider says the target does not exist.
fn is_missing(err: &impl ProvideErrorMetadata) -> bool {
    let code = err.code().unwrap_or_default();
    let message = err.message().unwrap_or_default();

    code.ends_with(".NotFound")
        || code == "NoSuchEntity"
        || (code == "ValidationError" && message.contains("does not exist"))
}

/// Pass the provider's own message through.
fn api_error<E>(err: E) -> Error
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = match (err.message(), err.code()) {
        (Some(message), _) => message.to_string(),
        (None, Some(code)) => code.to_string(),
        (None, None) => DisplayErrorContext(&err).to_string(),
    };
    CloudError::Api(message).into()
}
