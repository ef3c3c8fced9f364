//! Tool errors.

use thiserror::Error;

use tbs_core::error::ScenarioError;

/// Errors raised by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Loading or evaluating the scenario failed.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// The named player is not part of the scenario.
    #[error("Scenario has no player named '{0}'")]
    UnknownPlayer(String),

    /// Report serialization failed.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
