//! Rule registry.
//!
//! The registry is built once at process start and handed to the evaluator
//! by reference. It replaces discovery through module-level singletons.

use std::collections::BTreeMap;
use std::sync::Arc;

use glob::Pattern;
use tracing::{debug, warn};

use tfpolicy_iac::ResourceConfiguration;

use crate::checks;
use crate::error::{PolicyError, PolicyResult};
use crate::rule::{Rule, RuleMetadata, Verdict};

/// A rule together with its supported-resource patterns, compiled once.
#[derive(Clone)]
struct RegisteredRule {
    rule: Arc<dyn Rule>,
    patterns: Vec<Pattern>,
}

impl RegisteredRule {
    fn compile(rule: Arc<dyn Rule>) -> PolicyResult<Self> {
        let patterns = rule
            .supported_resources()
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| PolicyError::InvalidPattern {
                    rule: rule.id().to_string(),
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<PolicyResult<Vec<_>>>()?;
        Ok(Self { rule, patterns })
    }

    fn matches(&self, resource_type: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(resource_type))
    }
}

/// A registry of rules keyed by rule id, iterated in id order.
#[derive(Default, Clone)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RegisteredRule>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Create a registry holding the built-in rules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for rule in checks::builtin_rules() {
            if let Err(e) = registry.register(rule) {
                warn!("Skipping built-in rule: {}", e);
            }
        }
        registry
    }

    /// Register a rule.
    ///
    /// Fails if the id is already taken or a supported-resource pattern is
    /// not a valid glob.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> PolicyResult<()> {
        if self.rules.contains_key(rule.id()) {
            return Err(PolicyError::DuplicateRule(rule.id().to_string()));
        }

        let registered = RegisteredRule::compile(rule)?;
        let id = registered.rule.id().to_string();
        debug!("Registering rule: {}", id);
        self.rules.insert(id, registered);
        Ok(())
    }

    /// Get a rule by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Rule>> {
        self.rules.get(id).map(|r| r.rule.clone())
    }

    /// Get a rule by id, returning an error if not found.
    pub fn get_required(&self, id: &str) -> PolicyResult<Arc<dyn Rule>> {
        self.get(id)
            .ok_or_else(|| PolicyError::RuleNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// Registered rule ids, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.rules.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove a rule from the registry.
    pub fn unregister(&mut self, id: &str) -> Option<Arc<dyn Rule>> {
        debug!("Unregistering rule: {}", id);
        self.rules.remove(id).map(|r| r.rule)
    }

    /// Iterate over all rules in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.values().map(|r| &r.rule)
    }

    /// Rules whose supported resources match the given resource type.
    pub fn rules_for<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a Arc<dyn Rule>> + 'a {
        self.rules
            .values()
            .filter(move |r| r.matches(resource_type))
            .map(|r| &r.rule)
    }

    /// Metadata for every registered rule.
    pub fn metadata(&self) -> Vec<RuleMetadata> {
        self.iter().map(|rule| rule.metadata()).collect()
    }

    /// Evaluate a single rule by id.
    pub fn evaluate(&self, id: &str, config: &ResourceConfiguration) -> PolicyResult<Verdict> {
        Ok(self.get_required(id)?.evaluate(config))
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::CheckCategory;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestRule {
        id: &'static str,
        patterns: Vec<&'static str>,
    }

    impl Rule for TestRule {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            "Test rule"
        }

        fn categories(&self) -> &[CheckCategory] {
            &[CheckCategory::GeneralSecurity]
        }

        fn supported_resources(&self) -> &[&str] {
            &self.patterns
        }

        fn evaluate(&self, _config: &ResourceConfiguration) -> Verdict {
            Verdict::Passed
        }
    }

    fn test_rule(id: &'static str, patterns: Vec<&'static str>) -> Arc<dyn Rule> {
        Arc::new(TestRule { id, patterns })
    }

    #[test]
    fn test_registry_builtin() {
        let registry = RuleRegistry::builtin();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec!["CKV_CUSTOM_1", "CKV_CUSTOM_2"]);
    }

    #[test]
    fn test_builtin_patterns_are_valid() {
        let mut registry = RuleRegistry::new();
        for rule in checks::builtin_rules() {
            registry.register(rule).unwrap();
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = RuleRegistry::new();
        assert!(registry.is_empty());

        registry
            .register(test_rule("CKV_TEST_1", vec!["aws_s3_bucket"]))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("CKV_TEST_1"));
    }

    #[test]
    fn test_registry_rejects_duplicate() {
        let mut registry = RuleRegistry::builtin();
        let result = registry.register(test_rule("CKV_CUSTOM_1", vec!["aws_*"]));
        assert!(matches!(result, Err(PolicyError::DuplicateRule(id)) if id == "CKV_CUSTOM_1"));
    }

    #[test]
    fn test_registry_rejects_invalid_pattern() {
        let mut registry = RuleRegistry::new();
        let result = registry.register(test_rule("CKV_TEST_1", vec!["aws_["]));
        assert!(matches!(result, Err(PolicyError::InvalidPattern { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_get_required() {
        let registry = RuleRegistry::builtin();
        assert!(registry.get_required("CKV_CUSTOM_2").is_ok());
        assert!(matches!(
            registry.get_required("CKV_AWS_20"),
            Err(PolicyError::RuleNotFound(_))
        ));
    }

    #[test]
    fn test_rules_for_resource_type() {
        let registry = RuleRegistry::builtin();

        let aws: Vec<_> = registry.rules_for("aws_vpc").map(|r| r.id().to_string()).collect();
        assert_eq!(aws, vec!["CKV_CUSTOM_1", "CKV_CUSTOM_2"]);

        let azure: Vec<_> = registry
            .rules_for("azurerm_virtual_network")
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(azure, vec!["CKV_CUSTOM_2"]);

        assert_eq!(registry.rules_for("random_id").count(), 0);
    }

    struct CountingRule {
        pattern_reads: AtomicUsize,
    }

    impl Rule for CountingRule {
        fn id(&self) -> &str {
            "CKV_TEST_COUNT"
        }

        fn name(&self) -> &str {
            "Counting rule"
        }

        fn categories(&self) -> &[CheckCategory] {
            &[CheckCategory::GeneralSecurity]
        }

        fn supported_resources(&self) -> &[&str] {
            self.pattern_reads.fetch_add(1, Ordering::SeqCst);
            &["aws_*", "google_storage_bucket"]
        }

        fn evaluate(&self, _config: &ResourceConfiguration) -> Verdict {
            Verdict::Passed
        }
    }

    #[test]
    fn test_patterns_compiled_once_at_registration() {
        let rule = Arc::new(CountingRule {
            pattern_reads: AtomicUsize::new(0),
        });
        let mut registry = RuleRegistry::new();
        registry.register(rule.clone()).unwrap();
        let reads_after_register = rule.pattern_reads.load(Ordering::SeqCst);

        for resource_type in ["aws_vpc", "google_storage_bucket", "azurerm_key_vault"] {
            let _ = registry.rules_for(resource_type).count();
        }

        assert_eq!(rule.pattern_reads.load(Ordering::SeqCst), reads_after_register);
        assert_eq!(registry.rules_for("aws_vpc").count(), 1);
        assert_eq!(registry.rules_for("google_storage_bucket").count(), 1);
        assert_eq!(registry.rules_for("google_compute_network").count(), 0);
    }

    #[test]
    fn test_registry_evaluate_by_id() {
        let registry = RuleRegistry::builtin();
        let config = ResourceConfiguration::new().with_attribute("name", json!("prod-vpc"));

        assert_eq!(registry.evaluate("CKV_CUSTOM_1", &config).unwrap(), Verdict::Failed);
        assert!(registry.evaluate("CKV_MISSING", &config).is_err());
    }

    #[test]
    fn test_registry_unregister() {
        let mut registry = RuleRegistry::builtin();
        assert!(registry.unregister("CKV_CUSTOM_1").is_some());
        assert!(!registry.contains("CKV_CUSTOM_1"));
        assert_eq!(registry.metadata().len(), 1);
    }
}
