//! Core library components.
//!
//! Everything that provisions, records and tears down an environment. The
//! command-line layer only wires these together.

pub mod cloud;
pub mod config;
pub mod constants;
pub mod manifest;
pub mod orchestrator;
pub mod store;
pub mod validation;
