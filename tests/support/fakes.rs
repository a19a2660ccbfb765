//! In-memory stand-ins for the orchestrator's collaborators.
//!
//! Each fake records what it was asked to do and can be told to fail a
//! given step with a fixed message. Failures surface as errors whose
//! `Display` is exactly that message.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

use zeroize::Zeroizing;

use tubes::core::cloud::{
    poll_stack, AccessKey, Clock, CloudProvider, ImageFilter, StackResources, StatusClassifier,
    WaitPolicy, STACK_NOT_FOUND,
};
use tubes::core::manifest::ManifestBuilder;
use tubes::core::store::ConfigStore;
use tubes::error::{CloudError, Error, Result, StoreError};

use super::fixtures::{FAKE_AMI, FAKE_BOSH_USER, SSH_KEY_PEM};

// ============================================================================
// Clock
// ============================================================================

/// Simulated time; `sleep` advances it instantly.
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    /// Total simulated time slept so far.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }
}

// ============================================================================
// Cloud
// ============================================================================

/// A cloud operation, for scripting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CreateKeyPair,
    LatestImageId,
    UpsertStack,
    WaitForStack,
    StackResources,
    CreateAccessKey,
    DeleteStack,
    DeleteKeyPair,
}

/// A recorded cloud call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateKeyPair(String),
    LatestImageId(ImageFilter),
    UpsertStack {
        name: String,
        template: String,
        parameters: BTreeMap<String, String>,
    },
    WaitForStack(String, StatusClassifier),
    StackResources(String),
    CreateAccessKey(String),
    DeleteStack(String),
    DeleteKeyPair(String),
}

impl Call {
    pub fn step(&self) -> Step {
        match self {
            Call::CreateKeyPair(_) => Step::CreateKeyPair,
            Call::LatestImageId(_) => Step::LatestImageId,
            Call::UpsertStack { .. } => Step::UpsertStack,
            Call::WaitForStack(..) => Step::WaitForStack,
            Call::StackResources(_) => Step::StackResources,
            Call::CreateAccessKey(_) => Step::CreateAccessKey,
            Call::DeleteStack(_) => Step::DeleteStack,
            Call::DeleteKeyPair(_) => Step::DeleteKeyPair,
        }
    }
}

/// Stateful fake control plane.
///
/// Keypairs and stacks live in sets so that duplicate creation and
/// repeated deletion behave like the real thing. Waits run the real poll
/// loop against `statuses`, falling back to the stack's settled status
/// once the script runs out.
pub struct FakeCloud {
    calls: RefCell<Vec<Call>>,
    failures: RefCell<HashMap<Step, String>>,
    key_pairs: RefCell<BTreeSet<String>>,
    stacks: RefCell<BTreeSet<String>>,
    statuses: RefCell<VecDeque<String>>,
    pub resources: RefCell<StackResources>,
    pub clock: ManualClock,
    pub policy: WaitPolicy,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(HashMap::new()),
            key_pairs: RefCell::new(BTreeSet::new()),
            stacks: RefCell::new(BTreeSet::new()),
            statuses: RefCell::new(VecDeque::new()),
            resources: RefCell::new(default_resources()),
            clock: ManualClock::new(),
            policy: WaitPolicy {
                interval: Duration::from_secs(5),
                timeout: Duration::from_secs(300),
            },
        }
    }

    /// Make `step` fail with `message` from now on.
    pub fn fail(&self, step: Step, message: &str) {
        self.failures.borrow_mut().insert(step, message.to_string());
    }

    /// Queue statuses for the next waits to observe.
    pub fn script_statuses(&self, statuses: &[&str]) {
        self.statuses
            .borrow_mut()
            .extend(statuses.iter().map(|s| s.to_string()));
    }

    /// Pretend a keypair already exists.
    pub fn add_key_pair(&self, name: &str) {
        self.key_pairs.borrow_mut().insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls.borrow().iter().map(Call::step).collect()
    }

    pub fn called(&self, step: Step) -> bool {
        self.steps().contains(&step)
    }

    pub fn has_key_pair(&self, name: &str) -> bool {
        self.key_pairs.borrow().contains(name)
    }

    pub fn has_stack(&self, name: &str) -> bool {
        self.stacks.borrow().contains(name)
    }

    fn record(&self, call: Call) -> Result<()> {
        let step = call.step();
        self.calls.borrow_mut().push(call);
        match self.failures.borrow().get(&step) {
            Some(message) => Err(CloudError::Api(message.clone()).into()),
            None => Ok(()),
        }
    }

    fn settled_status(&self, name: &str) -> String {
        if self.has_stack(name) {
            "CREATE_COMPLETE".to_string()
        } else {
            STACK_NOT_FOUND.to_string()
        }
    }
}

impl CloudProvider for FakeCloud {
    fn latest_image_id(&self, filter: &ImageFilter) -> Result<String> {
        self.record(Call::LatestImageId(filter.clone()))?;
        Ok(FAKE_AMI.to_string())
    }

    fn upsert_stack(
        &self,
        name: &str,
        template: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<()> {
        self.record(Call::UpsertStack {
            name: name.to_string(),
            template: template.to_string(),
            parameters: parameters.clone(),
        })?;
        self.stacks.borrow_mut().insert(name.to_string());
        Ok(())
    }

    fn wait_for_stack(&self, name: &str, classifier: StatusClassifier) -> Result<()> {
        self.record(Call::WaitForStack(name.to_string(), classifier))?;
        poll_stack(name, classifier, &self.policy, &self.clock, || {
            let scripted = self.statuses.borrow_mut().pop_front();
            Ok(scripted.unwrap_or_else(|| self.settled_status(name)))
        })
    }

    fn delete_stack(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteStack(name.to_string()))?;
        self.stacks.borrow_mut().remove(name);
        Ok(())
    }

    fn stack_resources(&self, name: &str) -> Result<StackResources> {
        self.record(Call::StackResources(name.to_string()))?;
        if !self.has_stack(name) {
            return Err(CloudError::Api(format!("Stack with id {name} does not exist")).into());
        }
        Ok(self.resources.borrow().clone())
    }

    fn create_key_pair(&self, name: &str) -> Result<Zeroizing<Vec<u8>>> {
        self.record(Call::CreateKeyPair(name.to_string()))?;
        if !self.key_pairs.borrow_mut().insert(name.to_string()) {
            return Err(CloudError::KeyPairExists(name.to_string()).into());
        }
        Ok(Zeroizing::new(SSH_KEY_PEM.to_vec()))
    }

    fn delete_key_pair(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteKeyPair(name.to_string()))?;
        self.key_pairs.borrow_mut().remove(name);
        Ok(())
    }

    fn create_access_key(&self, user_name: &str) -> Result<AccessKey> {
        self.record(Call::CreateAccessKey(user_name.to_string()))?;
        Ok(AccessKey {
            id: "some-access-key".to_string(),
            secret: Zeroizing::new("some-secret-key".to_string()),
        })
    }
}

fn default_resources() -> StackResources {
    StackResources {
        account_id: "ping pong".to_string(),
        region: "us-west-2".to_string(),
        vpc_id: "vpc-1234".to_string(),
        bosh_subnet_id: "subnet-1234".to_string(),
        bosh_availability_zone: "us-west-2a".to_string(),
        bosh_security_group: "sg-1234".to_string(),
        bosh_user: FAKE_BOSH_USER.to_string(),
        nat_instance_id: "i-1234".to_string(),
    }
}

// ============================================================================
// Config store
// ============================================================================

/// Map-backed config store with per-key write failures.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, Vec<u8>>>,
    set_errors: RefCell<HashMap<String, String>>,
    get_errors: RefCell<HashMap<String, String>>,
    is_empty_error: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &[u8]) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
    }

    /// Forget every stored value.
    pub fn clear(&self) {
        self.values.borrow_mut().clear();
    }

    pub fn value(&self, key: &str) -> Option<Vec<u8>> {
        self.values.borrow().get(key).cloned()
    }

    pub fn fail_set(&self, key: &str, message: &str) {
        self.set_errors
            .borrow_mut()
            .insert(key.to_string(), message.to_string());
    }

    pub fn fail_get(&self, key: &str, message: &str) {
        self.get_errors
            .borrow_mut()
            .insert(key.to_string(), message.to_string());
    }

    pub fn fail_is_empty(&self, message: &str) {
        *self.is_empty_error.borrow_mut() = Some(message.to_string());
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        if let Some(message) = self.get_errors.borrow().get(key) {
            return Err(io::Error::other(message.clone()).into());
        }
        self.value(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()).into())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        if let Some(message) = self.set_errors.borrow().get(key) {
            return Err(io::Error::other(message.clone()).into());
        }
        self.insert(key, value);
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        if let Some(message) = self.is_empty_error.borrow().as_ref() {
            return Err(io::Error::other(message.clone()).into());
        }
        Ok(self.values.borrow().is_empty())
    }
}

// ============================================================================
// Manifest builder
// ============================================================================

/// What the builder was handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub name: String,
    pub resources: StackResources,
    pub access_key_id: String,
    pub secret_key: String,
}

/// Returns fixed bytes and remembers its inputs.
pub struct FakeManifestBuilder {
    pub manifest: Vec<u8>,
    requests: RefCell<Vec<BuildRequest>>,
    error: RefCell<Option<String>>,
}

impl FakeManifestBuilder {
    pub fn new() -> Self {
        Self {
            manifest: b"some-manifest-bytes".to_vec(),
            requests: RefCell::new(Vec::new()),
            error: RefCell::new(None),
        }
    }

    pub fn fail(&self, message: &str) {
        *self.error.borrow_mut() = Some(message.to_string());
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.borrow().clone()
    }
}

impl ManifestBuilder for FakeManifestBuilder {
    fn build(
        &self,
        name: &str,
        resources: &StackResources,
        access_key: &AccessKey,
    ) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(BuildRequest {
            name: name.to_string(),
            resources: resources.clone(),
            access_key_id: access_key.id.clone(),
            secret_key: access_key.secret.to_string(),
        });
        if let Some(message) = self.error.borrow().as_ref() {
            return Err(Error::Io(io::Error::other(message.clone())));
        }
        Ok(self.manifest.clone())
    }
}
