//! Evaluator configuration.
//!
//! The host builds this in code or deserializes it from YAML it already
//! holds. Nothing here reads files or the environment.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PolicyError, PolicyResult};
use crate::registry::RuleRegistry;

/// Selects which registered rules run and how resources are scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// When non-empty, only these rule ids run
    #[serde(default)]
    pub checks: Vec<String>,
    /// Rule ids that never run; wins over `checks`
    #[serde(default)]
    pub skip_checks: Vec<String>,
    /// Evaluate resources on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> PolicyResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Restrict evaluation to the given rule ids.
    pub fn with_checks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checks = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Exclude the given rule ids from evaluation.
    pub fn with_skip_checks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_checks = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Whether a rule id is selected by this configuration.
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        if self.skip_checks.iter().any(|id| id == rule_id) {
            return false;
        }
        self.checks.is_empty() || self.checks.iter().any(|id| id == rule_id)
    }

    /// Reject blank rule ids.
    pub fn validate(&self) -> PolicyResult<()> {
        let blank = self
            .checks
            .iter()
            .chain(&self.skip_checks)
            .any(|id| id.trim().is_empty());
        if blank {
            return Err(PolicyError::InvalidConfiguration(
                "rule ids must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Rule ids referenced by this configuration that are not registered.
    pub fn unknown_rule_ids<'a>(&'a self, registry: &RuleRegistry) -> Vec<&'a str> {
        let mut unknown: Vec<&str> = self
            .checks
            .iter()
            .chain(&self.skip_checks)
            .map(|id| id.as_str())
            .filter(|id| !registry.contains(id))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }

    /// Log configuration entries that will have no effect.
    pub(crate) fn warn_unknown(&self, registry: &RuleRegistry) {
        for id in self.unknown_rule_ids(registry) {
            warn!("Ignoring unknown rule id in evaluator configuration: {}", id);
        }
    }
}
