//! The rule contract shared by every policy check.

use serde::{Deserialize, Serialize};

use tfpolicy_iac::ResourceConfiguration;

/// Outcome of evaluating one rule against one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Passed,
    Failed,
    /// The rule applied but was not evaluated (suppressed for this resource).
    Skipped,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Passed => "PASSED",
            Verdict::Failed => "FAILED",
            Verdict::Skipped => "SKIPPED",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed)
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reporting categories understood by the host scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckCategory {
    Logging,
    Encryption,
    GeneralSecurity,
    Networking,
    Iam,
    BackupAndRecovery,
    Convention,
    Secrets,
    Kubernetes,
    ApplicationSecurity,
    SupplyChain,
    ApiSecurity,
}

impl CheckCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckCategory::Logging => "LOGGING",
            CheckCategory::Encryption => "ENCRYPTION",
            CheckCategory::GeneralSecurity => "GENERAL_SECURITY",
            CheckCategory::Networking => "NETWORKING",
            CheckCategory::Iam => "IAM",
            CheckCategory::BackupAndRecovery => "BACKUP_AND_RECOVERY",
            CheckCategory::Convention => "CONVENTION",
            CheckCategory::Secrets => "SECRETS",
            CheckCategory::Kubernetes => "KUBERNETES",
            CheckCategory::ApplicationSecurity => "APPLICATION_SECURITY",
            CheckCategory::SupplyChain => "SUPPLY_CHAIN",
            CheckCategory::ApiSecurity => "API_SECURITY",
        }
    }
}

impl std::fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive data the host uses to filter and report on a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub id: String,
    pub name: String,
    pub categories: Vec<CheckCategory>,
    pub supported_resources: Vec<String>,
}

/// A policy check over a single resource configuration.
///
/// Implementations must be stateless: the same configuration always yields
/// the same verdict, and rules may be shared across threads and invoked
/// concurrently for different resources.
pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `CKV_CUSTOM_1`.
    fn id(&self) -> &str;

    /// Human-readable description of what the rule enforces.
    fn name(&self) -> &str;

    fn categories(&self) -> &[CheckCategory];

    /// Resource type patterns this rule applies to. Exact type names or
    /// globs such as `aws_*`.
    fn supported_resources(&self) -> &[&str];

    /// Evaluate the rule. Must not fail; malformed input resolves to a verdict.
    fn evaluate(&self, config: &ResourceConfiguration) -> Verdict;

    /// Whether the host should invoke this rule for the given resource type.
    fn applies_to(&self, resource_type: &str) -> bool {
        self.supported_resources()
            .iter()
            .any(|pattern| resource_matches(pattern, resource_type))
    }

    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            id: self.id().to_string(),
            name: self.name().to_string(),
            categories: self.categories().to_vec(),
            supported_resources: self
                .supported_resources()
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Match a resource type against a supported-resource pattern.
///
/// Compiles the pattern on every call; [`RuleRegistry`](crate::RuleRegistry)
/// keeps compiled patterns for repeated lookups. Invalid patterns never match.
pub fn resource_matches(pattern: &str, resource_type: &str) -> bool {
    glob::Pattern::new(pattern)
        .map(|pat| pat.matches(resource_type))
        .unwrap_or(false)
}
