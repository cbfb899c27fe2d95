//! Cloud provider resource namespaces.

use serde::{Deserialize, Serialize};

/// Supported cloud providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    /// Wildcard pattern matching every resource type of this provider.
    pub const fn resource_pattern(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws_*",
            CloudProvider::Azure => "azurerm_*",
            CloudProvider::Gcp => "google_*",
        }
    }
}
