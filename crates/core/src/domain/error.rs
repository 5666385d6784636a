// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing signing key: an API key is required to sign a tenant token")]
    MissingSigningKey,

    #[error("Missing search rules: a tenant token needs at least one search rule")]
    MissingSearchRules,

    #[error("Expired token: expiresAt ({expires_at}) must be in the future")]
    ExpiredToken { expires_at: i64 },

    #[error("Invalid API key uid: {0:?} is not a valid UUID")]
    InvalidApiKeyUid(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Token verification failed: {0}")]
    Verification(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
