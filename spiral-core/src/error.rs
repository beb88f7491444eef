//! Error types for roadmap operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::id::Level;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the roadmap core.
///
/// Every failure is surfaced to the caller. The single exception is next-ID
/// scanning in [`crate::generator`], which skips malformed existing IDs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed id '{input}': {reason}")]
    MalformedId { input: String, reason: String },

    #[error("invalid parent '{parent}': {reason}")]
    InvalidParent { parent: String, reason: String },

    #[error("{kind} id {id} already exists")]
    DuplicateId { kind: &'static str, id: String },

    #[error("expected a {expected} id, got {found} id '{id}'")]
    UnexpectedLevel {
        id: String,
        expected: Level,
        found: Level,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("no ids left under {scope}")]
    Exhausted { scope: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("roadmap validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to encode {what}: {message}")]
    Encode { what: &'static str, message: String },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedId {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parent(parent: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParent {
            parent: parent.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// The first roadmap invariant found violated by [`crate::validate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("milestone at index {index} has empty ID")]
    EmptyMilestoneId { index: usize },

    #[error("milestone {id} has empty title")]
    EmptyMilestoneTitle { id: String },

    #[error("milestone {id} has family {family}, expected {expected}")]
    FamilyMismatch {
        id: String,
        family: String,
        expected: char,
    },

    #[error("task at index {index} has empty ID")]
    EmptyTaskId { index: usize },

    #[error("task {id} has empty title")]
    EmptyTaskTitle { id: String },

    #[error("task {id} has empty parent_id")]
    EmptyParentId { id: String },

    #[error("duplicate milestone ID: {id}")]
    DuplicateMilestoneId { id: String },

    #[error("duplicate task ID: {id}")]
    DuplicateTaskId { id: String },

    #[error("task {id} references non-existent parent: {parent_id}")]
    MissingParent { id: String, parent_id: String },

    #[error("{id} has invalid priority: {value}")]
    InvalidPriority { id: String, value: String },

    #[error("milestone {id} has invalid cycle_status: {value}")]
    InvalidCycleStatus { id: String, value: String },

    #[error("task {id} has invalid status: {value}")]
    InvalidTaskStatus { id: String, value: String },
}
