//! Built-in policy checks.

use std::sync::Arc;

use crate::rule::Rule;

mod compliance_tags;
mod naming_convention;

pub use compliance_tags::{ComplianceTagRule, COMPLIANCE_FRAMEWORKS, COMPLIANCE_TAG, COMPLIANCE_TAG_RULE_ID};
pub use naming_convention::{NamingConventionRule, NAME_DELIMITER, NAME_TAG, NAMING_CONVENTION_RULE_ID};

/// All built-in rules, in id order.
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![Arc::new(NamingConventionRule), Arc::new(ComplianceTagRule)]
}
