//! Error types for Arbor core operations.
//!
//! Every fallible operation returns one of these typed errors. None of them is
//! fatal: callers log and degrade (empty list, skipped node, unchanged view).

use thiserror::Error;

/// Rejected numeric input for a validated value type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{field} must be finite, got: {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be positive, got: {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("block id cannot be empty")]
    EmptyId,
}

impl ValueError {
    /// Create a non-finite value error.
    #[must_use]
    pub const fn not_finite(field: &'static str, value: f64) -> Self {
        Self::NotFinite { field, value }
    }

    /// Create a non-positive value error.
    #[must_use]
    pub const fn not_positive(field: &'static str, value: f64) -> Self {
        Self::NotPositive { field, value }
    }
}

/// Failures reported by an idea store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to load ideas for project '{project}': {reason}")]
    LoadFailed { project: String, reason: String },

    #[error("failed to create idea: {reason}")]
    CreateFailed { reason: String },

    #[error("failed to update idea '{id}': {reason}")]
    UpdateFailed { id: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Create a load failure.
    pub fn load_failed(project: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            project: project.into(),
            reason: reason.into(),
        }
    }

    /// Create a create failure.
    pub fn create_failed(reason: impl Into<String>) -> Self {
        Self::CreateFailed {
            reason: reason.into(),
        }
    }

    /// Create an update failure.
    pub fn update_failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpdateFailed {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Structural violations rejected by the block tree reducer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown block: {0}")]
    UnknownBlock(String),

    #[error("block already exists: {0}")]
    DuplicateBlock(String),

    #[error("block '{0}' cannot be its own parent")]
    SelfParent(String),

    #[error("attaching '{child}' under '{parent}' would create a cycle")]
    Cycle { parent: String, child: String },
}

/// Configuration parse and validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid config value '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Create an invalid-field error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
