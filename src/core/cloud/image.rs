//! Machine image lookup.

use std::fmt;

/// Criteria an image must match. Every field is an exact match except
/// `name`, which may end in a `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFilter {
    pub owner: String,
    pub name: String,
    pub architecture: String,
    pub virtualization_type: String,
    pub root_device_type: String,
}

impl ImageFilter {
    /// Amazon's VPC NAT instance images.
    pub fn nat_box() -> Self {
        Self {
            owner: "amazon".to_string(),
            name: "amzn-ami-vpc-nat-hvm*".to_string(),
            architecture: "x86_64".to_string(),
            virtualization_type: "hvm".to_string(),
            root_device_type: "ebs".to_string(),
        }
    }

    /// Check an image against the criteria.
    pub fn matches(&self, image: &Image) -> bool {
        let name_matches = match self.name.strip_suffix('*') {
            Some(prefix) => image.name.starts_with(prefix),
            None => image.name == self.name,
        };

        name_matches
            && image.owner == self.owner
            && image.architecture == self.architecture
            && image.virtualization_type == self.virtualization_type
            && image.root_device_type == self.root_device_type
    }
}

impl fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}, {}, {})",
            self.owner, self.name, self.architecture, self.virtualization_type, self.root_device_type
        )
    }
}

/// The image attributes tubes cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub architecture: String,
    pub virtualization_type: String,
    pub root_device_type: String,
    /// ISO-8601 timestamp as reported by the provider.
    pub creation_date: String,
}

/// Pick the most recently created image.
///
/// Creation dates are compared as strings; ISO-8601 timestamps sort
/// chronologically that way. Among equal dates the later entry wins.
pub fn latest_image(images: &[Image]) -> Option<&Image> {
    images.iter().max_by(|a, b| a.creation_date.cmp(&b.creation_date))
}
