//! Error types for policy module.

use thiserror::Error;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors that can occur while registering rules or configuring evaluation.
///
/// Rule evaluation itself is total and never returns one of these.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Duplicate rule id: {0}")]
    DuplicateRule(String),

    #[error("Invalid resource pattern for {rule}: '{pattern}' - {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },

    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    #[error("Invalid evaluator configuration: {0}")]
    InvalidConfiguration(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Resource error: {0}")]
    Iac(#[from] tfpolicy_iac::IacError),
}
