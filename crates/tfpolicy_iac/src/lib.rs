//! # tfpolicy_iac
//!
//! Resource configuration model for tfpolicy.
//!
//! The host scanner parses infrastructure definitions and hands each resource
//! block over as a [`ResourceConfiguration`]. This crate owns that model and
//! the normalization rules read attributes through.
//!
//! ## Features
//!
//! - Attribute bag with JSON/YAML construction at the host boundary
//! - Single-element list unwrapping ([`normalize::unwrap`])
//! - Canonical scalar/mapping view of attributes ([`NormalizedValue`])
//! - Cloud provider resource type patterns (`aws_*`, `azurerm_*`, `google_*`)
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tfpolicy_iac::{CloudProvider, ResourceConfiguration};
//!
//! let config = ResourceConfiguration::new()
//!     .with_attribute("name", json!(["my-cluster-prod-vpc"]))
//!     .with_attribute("tags", json!([{"Compliance": "HIPAA"}]));
//!
//! assert_eq!(config.name().unwrap().to_text(), "my-cluster-prod-vpc");
//! assert_eq!(config.tag("Compliance"), Some(&json!("HIPAA")));
//! assert_eq!(CloudProvider::Aws.resource_pattern(), "aws_*");
//! ```

pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;

pub use config::{ResourceConfiguration, NAME_ATTRIBUTE, TAGS_ATTRIBUTE};
pub use error::{IacError, IacResult};
pub use normalize::NormalizedValue;
pub use provider::CloudProvider;
