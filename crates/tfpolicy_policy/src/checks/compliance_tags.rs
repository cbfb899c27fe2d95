//! `CKV_CUSTOM_2`: resources declare a recognised compliance framework tag.

use tfpolicy_iac::normalize::{is_empty, text_form};
use tfpolicy_iac::{CloudProvider, ResourceConfiguration};

use crate::rule::{CheckCategory, Rule, Verdict};

pub const COMPLIANCE_TAG_RULE_ID: &str = "CKV_CUSTOM_2";

pub const COMPLIANCE_TAG: &str = "Compliance";

/// Frameworks accepted anywhere in the uppercased tag value.
pub const COMPLIANCE_FRAMEWORKS: [&str; 3] = ["HIPAA", "SOC2", "CIS"];

const SUPPORTED_RESOURCES: [&str; 3] = [
    CloudProvider::Aws.resource_pattern(),
    CloudProvider::Azure.resource_pattern(),
    CloudProvider::Gcp.resource_pattern(),
];

/// Requires a `Compliance` tag naming HIPAA, SOC2 or CIS.
///
/// Unlike the naming rule, missing tags fail: tagging is mandatory.
/// Matching is by substring, so `"SOC2,HIPAA"` and `"hipaa-controls"` pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceTagRule;

impl Rule for ComplianceTagRule {
    fn id(&self) -> &str {
        COMPLIANCE_TAG_RULE_ID
    }

    fn name(&self) -> &str {
        "Ensure resources have Compliance tag (HIPAA, SOC2, or CIS)"
    }

    fn categories(&self) -> &[CheckCategory] {
        &[CheckCategory::Convention]
    }

    fn supported_resources(&self) -> &[&str] {
        &SUPPORTED_RESOURCES
    }

    fn evaluate(&self, config: &ResourceConfiguration) -> Verdict {
        let Some(value) = config
            .tag(COMPLIANCE_TAG)
            .filter(|value| !is_empty(value))
        else {
            return Verdict::Failed;
        };

        let value = text_form(value).to_uppercase();
        Verdict::from(
            COMPLIANCE_FRAMEWORKS
                .iter()
                .any(|framework| value.contains(framework)),
        )
    }
}
