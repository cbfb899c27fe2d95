//! # tfpolicy_policy
//!
//! Policy rules for infrastructure-as-code resources, and the engine that
//! runs them.
//!
//! This crate provides:
//! - **Rule contract**: [`Rule`] with id, name, categories, supported
//!   resource patterns and a total `evaluate` returning a [`Verdict`]
//! - **Built-in checks**: naming convention (`CKV_CUSTOM_1`) and compliance
//!   tag (`CKV_CUSTOM_2`)
//! - **Registry**: an explicit [`RuleRegistry`] value instead of global singletons
//! - **Evaluation engine**: [`PolicyEvaluator`] producing one [`CheckResult`]
//!   per applicable (rule, resource) pair, sequentially or on a thread pool
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tfpolicy_iac::ResourceConfiguration;
//! use tfpolicy_policy::{PolicyEvaluator, ScannedResource, Verdict};
//!
//! let evaluator = PolicyEvaluator::builtin();
//! let vpc = ScannedResource::new(
//!     "aws_vpc",
//!     "aws_vpc.main",
//!     ResourceConfiguration::new()
//!         .with_attribute("name", json!("my-cluster-prod-vpc"))
//!         .with_attribute("tags", json!({"Compliance": "hipaa"})),
//! );
//!
//! let report = evaluator.evaluate(&[vpc]);
//! assert!(report.passed());
//! assert!(report.results.iter().all(|r| r.verdict == Verdict::Passed));
//! ```

#![forbid(unsafe_code)]

pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod rule;

pub use checks::{ComplianceTagRule, NamingConventionRule};
pub use config::EvaluatorConfig;
pub use engine::{
    CheckResult, EvaluationReport, EvaluationSummary, PolicyEvaluator, ScannedResource, Suppression,
};
pub use error::{PolicyError, PolicyResult};
pub use registry::RuleRegistry;
pub use rule::{resource_matches, CheckCategory, Rule, RuleMetadata, Verdict};
