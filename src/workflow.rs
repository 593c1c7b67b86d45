//! Review and approval workflow for generated options.
//!
//! Draft -> Pending Approval -> Approved, with "request changes" sending a pending option back
//! to Draft. Schedulers submit, admins approve or send back, faculty can only comment. Every
//! transition needs a comment, which goes into the option's log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum WorkflowStatus {
    #[default]
    Draft,
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    Approved,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            WorkflowStatus::Draft => "Draft",
            WorkflowStatus::PendingApproval => "Pending Approval",
            WorkflowStatus::Approved => "Approved",
        };
        f.write_str(status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Role {
    Admin,
    Scheduler,
    Faculty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowAction {
    Submit,
    Approve,
    RequestChanges,
}

impl WorkflowAction {
    fn permitted_for(self, role: Role) -> bool {
        matches!(
            (self, role),
            (WorkflowAction::Submit, Role::Scheduler)
                | (WorkflowAction::Approve, Role::Admin)
                | (WorkflowAction::RequestChanges, Role::Admin)
        )
    }
}

/// One entry of an option's review log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comment {
    pub role: Role,
    pub text: String,
}

/// Validates a comment and returns it trimmed.
pub fn comment(role: Role, text: &str) -> Result<Comment, WorkflowError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WorkflowError::EmptyComment);
    }
    Ok(Comment {
        role,
        text: text.to_string(),
    })
}

/// The status an action leads to, if the role may take it from `from`.
pub fn transition(
    from: WorkflowStatus,
    action: WorkflowAction,
    role: Role,
) -> Result<WorkflowStatus, WorkflowError> {
    if !action.permitted_for(role) {
        return Err(WorkflowError::NotPermitted { role, action });
    }
    match (from, action) {
        (WorkflowStatus::Draft, WorkflowAction::Submit) => Ok(WorkflowStatus::PendingApproval),
        (WorkflowStatus::PendingApproval, WorkflowAction::Approve) => Ok(WorkflowStatus::Approved),
        (WorkflowStatus::PendingApproval, WorkflowAction::RequestChanges) => {
            Ok(WorkflowStatus::Draft)
        }
        _ => Err(WorkflowError::InvalidTransition { from, action }),
    }
}
