//! Error types for hearth
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, missing hub, not signed in)
//! - 3: Blocked by policy (ownership, assignment rules)
//! - 4: Operation failed (store I/O, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the hearth CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for hearth operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Not a hearth hub: {0}")]
    HubNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Profile not found for {0}")]
    ProfileNotFound(String),

    // Policy blocks (exit code 3)
    #[error("Only the owner ({owner}) may change task {task_id}")]
    NotTaskOwner { task_id: String, owner: String },

    #[error("Only the author ({author}) may remove post {post_id}")]
    NotPostAuthor { post_id: String, author: String },

    #[error("Task {task_id} is already assigned to {assignee}")]
    AlreadyAssigned { task_id: String, assignee: String },

    #[error("Only the current assignee ({assignee}) may clear the assignment on task {task_id}")]
    NotAssignee { task_id: String, assignee: String },

    #[error("Task {0} is private and cannot be claimed")]
    PrivateTask(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Store error in collection {collection}: {message}")]
    Store { collection: String, message: String },

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::HubNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::NotSignedIn
            | Error::TaskNotFound(_)
            | Error::MessageNotFound(_)
            | Error::ProfileNotFound(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::NotTaskOwner { .. }
            | Error::NotPostAuthor { .. }
            | Error::AlreadyAssigned { .. }
            | Error::NotAssignee { .. }
            | Error::PrivateTask(_) => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::Store { .. }
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error envelopes, when available
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotTaskOwner { task_id, owner } => Some(serde_json::json!({
                "task_id": task_id,
                "owner": owner,
            })),
            Error::AlreadyAssigned { task_id, assignee }
            | Error::NotAssignee { task_id, assignee } => Some(serde_json::json!({
                "task_id": task_id,
                "assignee": assignee,
            })),
            _ => None,
        }
    }
}

/// Result type alias for hearth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
