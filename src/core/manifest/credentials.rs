//! Secret generation for director credentials.
//!
//! Draws exclusively from the operating system CSPRNG. Anything that only
//! needs to look random (display suffixes, test names) should use a
//! general-purpose generator instead and must never feed values back here.

use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::core::constants::CREDENTIAL_LENGTH;

/// Generates alphanumeric passwords.
#[derive(Debug, Clone, Copy)]
pub struct CredentialGenerator {
    length: usize,
}

impl CredentialGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// A fresh password.
    pub fn generate(&self) -> Zeroizing<String> {
        Zeroizing::new(Alphanumeric.sample_string(&mut OsRng, self.length))
    }
}

impl Default for CredentialGenerator {
    fn default() -> Self {
        Self::new(CREDENTIAL_LENGTH)
    }
}
