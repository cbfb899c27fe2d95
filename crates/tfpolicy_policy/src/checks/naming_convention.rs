//! `CKV_CUSTOM_1`: resource names follow `{cluster}-{environment}-*`.

use std::borrow::Cow;

use tfpolicy_iac::normalize::{is_empty, text_form};
use tfpolicy_iac::{CloudProvider, ResourceConfiguration};

use crate::rule::{CheckCategory, Rule, Verdict};

pub const NAMING_CONVENTION_RULE_ID: &str = "CKV_CUSTOM_1";

/// Tag consulted when a resource has no `name` attribute.
pub const NAME_TAG: &str = "Name";

pub const NAME_DELIMITER: char = '-';

/// `{cluster}-{environment}-{rest}`; `rest` may contain further delimiters.
const MIN_SEGMENTS: usize = 3;

const SUPPORTED_RESOURCES: [&str; 1] = [CloudProvider::Aws.resource_pattern()];

/// Ensures resource names carry at least cluster, environment and suffix segments.
///
/// Resources without any identifiable name pass: there is nothing to judge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingConventionRule;

impl NamingConventionRule {
    /// The name the rule judges: the `name` attribute, else the `Name` tag.
    ///
    /// The tag is only consulted when `name` is absent; a declared but empty
    /// `name` yields no name at all.
    fn resource_name(config: &ResourceConfiguration) -> Option<Cow<'_, str>> {
        match config.name() {
            Some(name) if name.is_empty() => None,
            Some(name) => Some(name.to_text()),
            None => config
                .tag(NAME_TAG)
                .filter(|value| !is_empty(value))
                .map(text_form),
        }
    }
}

impl Rule for NamingConventionRule {
    fn id(&self) -> &str {
        NAMING_CONVENTION_RULE_ID
    }

    fn name(&self) -> &str {
        "Ensure resources follow naming convention: {cluster_name}-{environment}-*"
    }

    fn categories(&self) -> &[CheckCategory] {
        &[CheckCategory::Convention]
    }

    fn supported_resources(&self) -> &[&str] {
        &SUPPORTED_RESOURCES
    }

    fn evaluate(&self, config: &ResourceConfiguration) -> Verdict {
        let Some(name) = Self::resource_name(config) else {
            return Verdict::Passed;
        };

        // Empty segments from leading or trailing delimiters still count.
        let segments = name.split(NAME_DELIMITER).count();
        Verdict::from(segments >= MIN_SEGMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evaluate(config: ResourceConfiguration) -> Verdict {
        NamingConventionRule.evaluate(&config)
    }

    fn named(name: serde_json::Value) -> ResourceConfiguration {
        ResourceConfiguration::new().with_attribute("name", name)
    }

    #[test]
    fn test_three_or_more_segments_pass() {
        assert_eq!(evaluate(named(json!("my-cluster-prod-vpc"))), Verdict::Passed);
        assert_eq!(evaluate(named(json!("core-dev-db"))), Verdict::Passed);
    }

    #[test]
    fn test_fewer_segments_fail() {
        assert_eq!(evaluate(named(json!("prod-vpc"))), Verdict::Failed);
        assert_eq!(evaluate(named(json!("vpc"))), Verdict::Failed);
    }

    #[test]
    fn test_empty_segments_count() {
        assert_eq!(evaluate(named(json!("-a-b"))), Verdict::Passed);
        assert_eq!(evaluate(named(json!("a--"))), Verdict::Passed);
        assert_eq!(evaluate(named(json!("-a"))), Verdict::Failed);
    }

    #[test]
    fn test_wrapped_name_matches_bare_name() {
        assert_eq!(evaluate(named(json!(["a-b-c"]))), evaluate(named(json!("a-b-c"))));
        assert_eq!(evaluate(named(json!(["a-b"]))), Verdict::Failed);
    }

    #[test]
    fn test_no_name_passes() {
        assert_eq!(evaluate(ResourceConfiguration::new()), Verdict::Passed);
        assert_eq!(evaluate(named(json!(null))), Verdict::Passed);
        assert_eq!(evaluate(named(json!([]))), Verdict::Passed);
        assert_eq!(evaluate(named(json!(""))), Verdict::Passed);
    }

    #[test]
    fn test_falls_back_to_name_tag() {
        let config = ResourceConfiguration::new().with_attribute("tags", json!({"Name": "vpc"}));
        assert_eq!(evaluate(config), Verdict::Failed);

        let config =
            ResourceConfiguration::new().with_attribute("tags", json!([{"Name": "eu-prod-vpc"}]));
        assert_eq!(evaluate(config), Verdict::Passed);
    }

    #[test]
    fn test_empty_name_ignores_name_tag() {
        let config = named(json!("")).with_attribute("tags", json!({"Name": "vpc"}));
        assert_eq!(evaluate(config), Verdict::Passed);

        let config = named(json!([""])).with_attribute("tags", json!({"Name": "vpc"}));
        assert_eq!(evaluate(config), Verdict::Passed);
    }

    #[test]
    fn test_unwrapped_absent_name_falls_back_to_tag() {
        let config = named(json!([])).with_attribute("tags", json!({"Name": "vpc"}));
        assert_eq!(evaluate(config), Verdict::Failed);

        let config = named(json!(null)).with_attribute("tags", json!({"Name": "vpc"}));
        assert_eq!(evaluate(config), Verdict::Failed);
    }

    #[test]
    fn test_name_attribute_wins_over_tag() {
        let config = named(json!("eu-prod-vpc")).with_attribute("tags", json!({"Name": "vpc"}));
        assert_eq!(evaluate(config), Verdict::Passed);
    }

    #[test]
    fn test_tags_without_name_pass() {
        let config = ResourceConfiguration::new().with_attribute("tags", json!({"Env": "prod"}));
        assert_eq!(evaluate(config), Verdict::Passed);

        let config = ResourceConfiguration::new().with_attribute("tags", json!("not-a-mapping"));
        assert_eq!(evaluate(config), Verdict::Passed);
    }

    #[test]
    fn test_non_string_name_uses_text_form() {
        assert_eq!(evaluate(named(json!(2024))), Verdict::Failed);
        assert_eq!(evaluate(named(json!({"a": "b-c-d"}))), Verdict::Passed);
    }

    #[test]
    fn test_metadata() {
        let meta = NamingConventionRule.metadata();
        assert_eq!(meta.id, "CKV_CUSTOM_1");
        assert_eq!(meta.categories, vec![CheckCategory::Convention]);
        assert_eq!(meta.supported_resources, vec!["aws_*".to_string()]);
        assert!(NamingConventionRule.applies_to("aws_vpc"));
        assert!(!NamingConventionRule.applies_to("google_compute_network"));
    }
}
