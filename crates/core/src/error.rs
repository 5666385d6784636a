// Central Error Type for the Client

use crate::domain::{TaskStatus, TaskUid};
use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the server for non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// HTTP status code (filled in by the client, not part of the body)
    #[serde(skip)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub link: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.code.is_empty() {
            write!(f, "HTTP {}: {}", self.status, self.message)
        } else {
            write!(f, "HTTP {} ({}): {}", self.status, self.code, self.message)
        }
    }
}

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::port::TransportError),

    #[error("API error: {0}")]
    Api(ApiError),

    #[error("Timed out waiting for task {task_uid} (last status: {})", display_status(.last_status))]
    WaitTimeout {
        task_uid: TaskUid,
        last_status: Option<TaskStatus>,
    },

    #[error("Wait for task {task_uid} was cancelled (last status: {})", display_status(.last_status))]
    WaitCancelled {
        task_uid: TaskUid,
        last_status: Option<TaskStatus>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

fn display_status(status: &Option<TaskStatus>) -> String {
    match status {
        Some(s) => s.to_string(),
        None => "unknown".to_string(),
    }
}

impl AppError {
    /// Task uid carried by a wait failure, if this is one
    pub fn task_uid(&self) -> Option<TaskUid> {
        match self {
            AppError::WaitTimeout { task_uid, .. } | AppError::WaitCancelled { task_uid, .. } => {
                Some(*task_uid)
            }
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
