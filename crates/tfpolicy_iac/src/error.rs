//! Error types for the resource model.

use thiserror::Error;

/// Result type alias for resource model operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors raised while building a [`ResourceConfiguration`](crate::ResourceConfiguration).
///
/// Evaluation itself never fails; these only surface at the host boundary.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Invalid resource configuration: {0}")]
    InvalidConfiguration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
