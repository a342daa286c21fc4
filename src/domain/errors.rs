//! # Errors
//!
//! The error taxonomy for registration, sync, handler execution, and
//! construction-time configuration checks.

use std::fmt;
use thiserror::Error;

/// Registration conflicts in the command registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Duplicate registration is rejected rather than silently replacing
    /// the earlier definition, so configuration mistakes surface at
    /// startup.
    #[error("duplicate command name `{0}`")]
    DuplicateName(String),
}

/// Which remote call a sync failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    List,
    Create,
    Update,
    Delete,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::List => "list",
            SyncAction::Create => "create",
            SyncAction::Update => "update",
            SyncAction::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote call failed during reconciliation. Partially applied changes
/// stand; re-running the sync is the recovery strategy.
#[derive(Debug, Error)]
#[error("sync: {action} `{name}` failed: {cause}")]
pub struct SyncError {
    pub action: SyncAction,
    pub name: String,
    pub cause: anyhow::Error,
}

/// A failure inside a handler invocation. The dispatcher logs these and
/// converts them into a generic visible reply; they never propagate as a
/// crash.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("missing required option `{0}`")]
    MissingOption(String),
    #[error("invalid value for option `{0}`")]
    BadOption(String),
    #[error("backend request failed: {0}")]
    Backend(String),
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        HandlerError::Other(err.to_string())
    }
}

/// Configuration problems detected at construction, not at call time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("context cache capacity must be at least 1")]
    InvalidCapacity,
}
