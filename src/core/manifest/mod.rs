//! Director manifest generation.
//!
//! Turns the discovered stack resources and the freshly minted IAM key into
//! a `bosh-init` manifest. The orchestrator treats the result as opaque
//! bytes and only stores it.

mod credentials;

pub use credentials::CredentialGenerator;

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::core::cloud::{AccessKey, StackResources};
use crate::error::{ManifestError, Result};

/// Static IP of the director inside the BOSH subnet.
const DIRECTOR_IP: &str = "10.0.0.6";

/// Builds the director manifest for an environment.
pub trait ManifestBuilder {
    fn build(&self, name: &str, resources: &StackResources, access_key: &AccessKey) -> Result<Vec<u8>>;
}

/// A downloadable release or stemcell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

impl Artifact {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sha1: None,
        }
    }
}

/// Releases and stemcell the director is installed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCatalog {
    pub bosh: Artifact,
    pub aws_cpi: Artifact,
    pub stemcell: Artifact,
}

impl Default for ReleaseCatalog {
    fn default() -> Self {
        Self {
            bosh: Artifact::new("https://bosh.io/d/github.com/cloudfoundry/bosh?v=255.3"),
            aws_cpi: Artifact::new(
                "https://bosh.io/d/github.com/cloudfoundry-incubator/bosh-aws-cpi-release?v=44",
            ),
            stemcell: Artifact::new(
                "https://bosh.io/d/stemcells/bosh-aws-xen-hvm-ubuntu-trusty-go_agent?v=3215",
            ),
        }
    }
}

/// Renders `bosh-init` manifests as YAML.
#[derive(Debug, Clone, Default)]
pub struct DirectorManifestBuilder {
    releases: ReleaseCatalog,
    credentials: CredentialGenerator,
}

impl DirectorManifestBuilder {
    pub fn new(releases: ReleaseCatalog, credentials: CredentialGenerator) -> Self {
        Self {
            releases,
            credentials,
        }
    }
}

impl ManifestBuilder for DirectorManifestBuilder {
    fn build(&self, name: &str, resources: &StackResources, access_key: &AccessKey) -> Result<Vec<u8>> {
        let nats_password = self.credentials.generate();
        let postgres_password = self.credentials.generate();
        let registry_password = self.credentials.generate();
        let blobstore_director_password = self.credentials.generate();
        let blobstore_agent_password = self.credentials.generate();
        let admin_password = self.credentials.generate();
        let hm_password = self.credentials.generate();
        let mbus_password = self.credentials.generate();

        let aws = json!({
            "access_key_id": access_key.id,
            "secret_access_key": access_key.secret.as_str(),
            "default_key_name": name,
            "default_security_groups": [resources.bosh_security_group],
            "region": resources.region,
        });
        let database = json!({
            "host": "127.0.0.1",
            "user": "postgres",
            "password": postgres_password.as_str(),
            "database": "bosh",
            "adapter": "postgres",
        });
        let ntp = json!(["0.pool.ntp.org", "1.pool.ntp.org"]);

        let manifest = json!({
            "name": "bosh",
            "releases": [
                { "name": "bosh", "url": self.releases.bosh.url, "sha1": self.releases.bosh.sha1 },
                { "name": "bosh-aws-cpi", "url": self.releases.aws_cpi.url, "sha1": self.releases.aws_cpi.sha1 },
            ],
            "resource_pools": [{
                "name": "vms",
                "network": "private",
                "stemcell": self.releases.stemcell,
                "cloud_properties": {
                    "instance_type": "m3.xlarge",
                    "ephemeral_disk": { "size": 25000, "type": "gp2" },
                    "availability_zone": resources.bosh_availability_zone,
                },
            }],
            "disk_pools": [{
                "name": "disks",
                "disk_size": 20000,
                "cloud_properties": { "type": "gp2" },
            }],
            "networks": [{
                "name": "private",
                "type": "manual",
                "subnets": [{
                    "range": "10.0.0.0/24",
                    "gateway": "10.0.0.1",
                    "dns": ["10.0.0.2"],
                    "cloud_properties": { "subnet": resources.bosh_subnet_id },
                }],
            }],
            "jobs": [{
                "name": "bosh",
                "instances": 1,
                "templates": [
                    { "name": "nats", "release": "bosh" },
                    { "name": "postgres", "release": "bosh" },
                    { "name": "blobstore", "release": "bosh" },
                    { "name": "director", "release": "bosh" },
                    { "name": "health_monitor", "release": "bosh" },
                    { "name": "registry", "release": "bosh" },
                    { "name": "aws_cpi", "release": "bosh-aws-cpi" },
                ],
                "resource_pool": "vms",
                "persistent_disk_pool": "disks",
                "networks": [{ "name": "private", "static_ips": [DIRECTOR_IP], "default": ["dns", "gateway"] }],
                "properties": {
                    "nats": { "address": "127.0.0.1", "user": "nats", "password": nats_password.as_str() },
                    "postgres": {
                        "listen_address": "127.0.0.1",
                        "host": "127.0.0.1",
                        "user": "postgres",
                        "password": postgres_password.as_str(),
                        "database": "bosh",
                        "adapter": "postgres",
                    },
                    "registry": {
                        "address": DIRECTOR_IP,
                        "host": DIRECTOR_IP,
                        "db": database,
                        "http": { "user": "admin", "password": registry_password.as_str(), "port": 25777 },
                        "username": "admin",
                        "password": registry_password.as_str(),
                        "port": 25777,
                    },
                    "blobstore": {
                        "address": DIRECTOR_IP,
                        "port": 25250,
                        "provider": "dav",
                        "director": { "user": "director", "password": blobstore_director_password.as_str() },
                        "agent": { "user": "agent", "password": blobstore_agent_password.as_str() },
                    },
                    "director": {
                        "address": "127.0.0.1",
                        "name": name,
                        "db": database,
                        "cpi_job": "aws_cpi",
                        "user_management": {
                            "provider": "local",
                            "local": {
                                "users": [
                                    { "name": "admin", "password": admin_password.as_str() },
                                    { "name": "hm", "password": hm_password.as_str() },
                                ],
                            },
                        },
                    },
                    "hm": {
                        "director_account": { "user": "hm", "password": hm_password.as_str() },
                        "resurrector_enabled": true,
                    },
                    "aws": aws,
                    "agent": { "mbus": format!("nats://nats:{}@{DIRECTOR_IP}:4222", nats_password.as_str()) },
                    "ntp": ntp,
                },
            }],
            "cloud_provider": {
                "template": { "name": "aws_cpi", "release": "bosh-aws-cpi" },
                "ssh_tunnel": { "host": DIRECTOR_IP, "port": 22, "user": "vcap", "private_key": "./ssh-key" },
                "mbus": format!("https://mbus:{}@{DIRECTOR_IP}:6868", mbus_password.as_str()),
                "properties": {
                    "aws": aws,
                    "agent": { "mbus": format!("https://mbus:{}@0.0.0.0:6868", mbus_password.as_str()) },
                    "blobstore": { "provider": "local", "path": "/var/vcap/micro_bosh/data/cache" },
                    "ntp": ntp,
                },
            },
        });

        let yaml = serde_yaml::to_string(&strip_nulls(manifest)).map_err(ManifestError::from)?;
        debug!(environment = name, bytes = yaml.len(), "rendered director manifest");
        Ok(yaml.into_bytes())
    }
}

/// Drop `null` members so absent checksums are left out entirely.
fn strip_nulls(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}
