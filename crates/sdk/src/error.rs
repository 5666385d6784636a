//! SDK Error Types

use meili_core::domain::{DomainError, TaskStatus, TaskUid};
use meili_core::port::TransportError;
use meili_core::{ApiError, AppError};
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response from the server
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

    #[error("Tenant token error: {0}")]
    TenantToken(DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn display_status(status: &Option<TaskStatus>) -> String {
    status.map_or_else(|| "unknown".to_string(), |s| s.to_string())
}

impl SdkError {
    /// Server error body, if the server answered with a non-2xx status
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            SdkError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, SdkError::WaitTimeout { .. })
    }
}

impl From<TransportError> for SdkError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Communication(msg) => SdkError::Connection(msg),
            TransportError::Timeout(msg) => SdkError::Timeout(msg),
            TransportError::InvalidResponse(msg) => SdkError::InvalidResponse(msg),
            TransportError::InvalidRequest(msg) => SdkError::InvalidRequest(msg),
        }
    }
}

impl From<AppError> for SdkError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Domain(e) => SdkError::TenantToken(e),
            AppError::Transport(e) => e.into(),
            AppError::Api(e) => SdkError::Api(e),
            AppError::WaitTimeout {
                task_uid,
                last_status,
            } => SdkError::WaitTimeout {
                task_uid,
                last_status,
            },
            AppError::WaitCancelled {
                task_uid,
                last_status,
            } => SdkError::WaitCancelled {
                task_uid,
                last_status,
            },
            AppError::Serialization(e) => SdkError::Serialization(e),
            AppError::Config(msg) => SdkError::Config(msg),
            AppError::Validation(msg) => SdkError::InvalidRequest(msg),
        }
    }
}

impl From<DomainError> for SdkError {
    fn from(e: DomainError) -> Self {
        SdkError::TenantToken(e)
    }
}

impl From<config::ConfigError> for SdkError {
    fn from(e: config::ConfigError) -> Self {
        SdkError::Config(e.to_string())
    }
}
