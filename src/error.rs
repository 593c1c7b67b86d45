//! Error types for the timetable engine.

use thiserror::Error;

use crate::workflow::{Role, WorkflowAction, WorkflowStatus};

/// Problems found while validating a constraint configuration or runtime settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Week template has no days")]
    NoDays,

    #[error("Week template has no periods")]
    NoPeriods,

    #[error("Week template lists day {0:?} more than once")]
    DuplicateDay(String),

    #[error("Week template lists period {0:?} more than once")]
    DuplicatePeriod(String),

    #[error("Unknown day {label:?} referenced by {context}")]
    UnknownDay { label: String, context: String },

    #[error("Unknown period {label:?} referenced by {context}")]
    UnknownPeriod { label: String, context: String },

    #[error("Option count must be at least 1")]
    ZeroOptions,

    #[error("Invalid bind address {0:?}")]
    InvalidAddress(String),
}

/// Precondition failures. Any of these makes `generate` return no options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("No data: department roster has no batches")]
    MissingBatches,

    #[error("No data: no classrooms supplied")]
    MissingClassrooms,

    #[error("No constraint configuration supplied")]
    MissingConstraints,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Rejected workflow or edit operations on an option.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("A comment is required")]
    EmptyComment,

    #[error("{role:?} may not {action:?}")]
    NotPermitted { role: Role, action: WorkflowAction },

    #[error("Cannot {action:?} from status {from}")]
    InvalidTransition {
        from: WorkflowStatus,
        action: WorkflowAction,
    },

    #[error("Option {0} is approved and can no longer be edited")]
    Locked(u32),
}
