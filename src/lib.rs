//! Tubes - ephemeral AWS environments for bootstrapping BOSH.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── context       # Flags and env vars to live collaborators
//! │   ├── output        # Styled errors and hints
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cloud/        # Cloud provider capability
//!     │   ├── mod       # CloudProvider trait, stack outputs
//!     │   ├── aws       # CloudFormation/EC2/IAM implementation
//!     │   ├── pundit    # Stack status classification
//!     │   └── wait      # Polling with timeout
//!     ├── config        # AWS settings, state directory
//!     ├── manifest/     # bosh-init director manifest
//!     ├── orchestrator/ # Boot, destroy and show workflows
//!     ├── store/        # Per-environment config store
//!     └── validation    # Environment name rules
//! ```
//!
//! Workflows only see capability traits ([`core::cloud::CloudProvider`],
//! [`core::store::ConfigStore`], [`core::manifest::ManifestBuilder`]), so
//! they run unchanged against in-memory fakes in tests.

pub mod cli;
pub mod core;
pub mod error;
