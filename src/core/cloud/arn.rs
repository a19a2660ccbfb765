//! Amazon Resource Names.
//!
//! <http://docs.aws.amazon.com/general/latest/gr/aws-arns-and-namespaces.html>

use std::fmt;
use std::str::FromStr;

use crate::error::{CloudError, Error};

/// A parsed ARN: `arn:partition:service:region:account-id:resource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl FromStr for Arn {
    type Err = Error;

    fn from_str(arn: &str) -> Result<Self, Self::Err> {
        const PARTS: usize = 6;

        // The resource part may itself contain colons.
        let parts: Vec<&str> = arn.splitn(PARTS, ':').collect();
        if parts.len() < PARTS || parts[0] != "arn" {
            return Err(CloudError::MalformedArn(arn.to_string()).into());
        }

        Ok(Self {
            partition: parts[1].to_string(),
            service: parts[2].to_string(),
            region: parts[3].to_string(),
            account_id: parts[4].to_string(),
            resource: parts[5].to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}
