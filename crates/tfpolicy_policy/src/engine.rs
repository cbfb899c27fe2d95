//! Policy evaluation engine.
//!
//! Drives every applicable rule over every resource the host discovered and
//! collects one [`CheckResult`] per (rule, resource) pairing. Rules are
//! stateless, so resources can be fanned out over a thread pool without
//! changing the outcome.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use tfpolicy_iac::ResourceConfiguration;

use crate::config::EvaluatorConfig;
use crate::error::PolicyResult;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, Verdict};

/// An inline suppression attached to a resource block by the host,
/// e.g. `#checkov:skip=CKV_CUSTOM_2:legacy bucket`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    pub check_id: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// One resource block handed over by the host scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedResource {
    /// Resource type, e.g. `aws_vpc`
    pub resource_type: String,
    /// Resource address, e.g. `aws_vpc.main`
    pub address: String,
    /// Declared attributes
    pub config: ResourceConfiguration,
    /// Rules suppressed for this resource
    #[serde(default)]
    pub suppressions: Vec<Suppression>,
}

impl ScannedResource {
    pub fn new(
        resource_type: impl Into<String>,
        address: impl Into<String>,
        config: ResourceConfiguration,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            address: address.into(),
            config,
            suppressions: Vec::new(),
        }
    }

    /// Build a resource from a raw attribute value produced by the host parser.
    pub fn from_value(
        resource_type: impl Into<String>,
        address: impl Into<String>,
        value: Value,
    ) -> PolicyResult<Self> {
        let config = ResourceConfiguration::from_value(value)?;
        Ok(Self::new(resource_type, address, config))
    }

    /// Suppress a rule for this resource.
    pub fn with_suppression(mut self, check_id: impl Into<String>, comment: Option<&str>) -> Self {
        self.suppressions.push(Suppression {
            check_id: check_id.into(),
            comment: comment.map(|c| c.to_string()),
        });
        self
    }

    pub fn suppression_for(&self, check_id: &str) -> Option<&Suppression> {
        self.suppressions.iter().find(|s| s.check_id == check_id)
    }
}

/// Result of evaluating one rule against one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Rule ID
    pub check_id: String,
    /// Rule name
    pub check_name: String,
    /// Resource type
    pub resource_type: String,
    /// Resource address
    pub resource: String,
    pub verdict: Verdict,
    /// Justification recorded with a suppression
    #[serde(default)]
    pub suppress_comment: Option<String>,
}

impl CheckResult {
    fn new(rule: &dyn Rule, resource: &ScannedResource, verdict: Verdict) -> Self {
        Self {
            check_id: rule.id().to_string(),
            check_name: rule.name().to_string(),
            resource_type: resource.resource_type.clone(),
            resource: resource.address.clone(),
            verdict,
            suppress_comment: None,
        }
    }

    fn skipped(rule: &dyn Rule, resource: &ScannedResource, suppression: &Suppression) -> Self {
        Self {
            suppress_comment: suppression.comment.clone(),
            ..Self::new(rule, resource, Verdict::Skipped)
        }
    }
}

/// Summary statistics for an evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub resources: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl EvaluationSummary {
    fn from_results(resources: usize, results: &[CheckResult]) -> Self {
        let count = |verdict: Verdict| results.iter().filter(|r| r.verdict == verdict).count();
        Self {
            resources,
            passed: count(Verdict::Passed),
            failed: count(Verdict::Failed),
            skipped: count(Verdict::Skipped),
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// All results of one evaluation run, in resource order then rule id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub results: Vec<CheckResult>,
    pub summary: EvaluationSummary,
    /// Timestamp when evaluation started
    pub started_at: DateTime<Utc>,
    /// Timestamp when evaluation completed
    pub completed_at: DateTime<Utc>,
}

impl EvaluationReport {
    /// True when no result failed.
    pub fn passed(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn failed_results(&self) -> Vec<&CheckResult> {
        self.results
            .iter()
            .filter(|r| r.verdict.is_failure())
            .collect()
    }

    pub fn results_for(&self, check_id: &str) -> Vec<&CheckResult> {
        self.results
            .iter()
            .filter(|r| r.check_id == check_id)
            .collect()
    }
}

/// Evaluates registered rules against scanned resources.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    registry: Arc<RuleRegistry>,
    config: EvaluatorConfig,
}

impl PolicyEvaluator {
    /// Create a new evaluator. Unknown rule ids in the config are logged and ignored.
    pub fn new(registry: Arc<RuleRegistry>, config: EvaluatorConfig) -> Self {
        config.warn_unknown(&registry);
        Self { registry, config }
    }

    /// Evaluator over the built-in rules with the default configuration.
    pub fn builtin() -> Self {
        Self::new(Arc::new(RuleRegistry::builtin()), EvaluatorConfig::default())
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate every enabled rule that applies to one resource.
    pub fn evaluate_resource(&self, resource: &ScannedResource) -> Vec<CheckResult> {
        self.registry
            .rules_for(&resource.resource_type)
            .filter(|rule| self.config.is_enabled(rule.id()))
            .map(|rule| {
                let result = match resource.suppression_for(rule.id()) {
                    Some(suppression) => CheckResult::skipped(&**rule, resource, suppression),
                    None => {
                        let verdict = rule.evaluate(&resource.config);
                        CheckResult::new(&**rule, resource, verdict)
                    }
                };
                debug!(
                    "{} on {}: {}",
                    result.check_id, result.resource, result.verdict
                );
                result
            })
            .collect()
    }

    /// Evaluate a batch of resources.
    pub fn evaluate(&self, resources: &[ScannedResource]) -> EvaluationReport {
        let started_at = Utc::now();

        let per_resource: Vec<Vec<CheckResult>> = if self.config.parallel {
            resources
                .par_iter()
                .map(|resource| self.evaluate_resource(resource))
                .collect()
        } else {
            resources
                .iter()
                .map(|resource| self.evaluate_resource(resource))
                .collect()
        };
        let results: Vec<CheckResult> = per_resource.into_iter().flatten().collect();

        let summary = EvaluationSummary::from_results(resources.len(), &results);
        info!(
            "Evaluated {} resources: {} passed, {} failed, {} skipped",
            summary.resources, summary.passed, summary.failed, summary.skipped
        );

        EvaluationReport {
            results,
            summary,
            started_at,
            completed_at: Utc::now(),
        }
    }
}
