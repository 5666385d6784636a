//! Tenant Token Generator
//!
//! Signs a set of search rules (and an optional expiry) into an HS256 JWT that
//! can be presented in place of the API key it was signed with. The server
//! verifies the signature and applies the rules on top of the key's own
//! permissions; nothing is enforced client-side.
//!
//! Payload layout:
//!
//! ```json
//! {
//!   "apiKeyUid": "6062abda-a5aa-4414-ac91-ecd7944c0f8d",
//!   "searchRules": { "*": {}, "books": { "filter": "year > 2000" } },
//!   "exp": 1700036000
//! }
//! ```

use crate::domain::error::Result;
use crate::domain::{DomainError, SearchRules};
use crate::port::TimeProvider;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Claims carried by a tenant token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantTokenClaims {
    pub api_key_uid: String,
    pub search_rules: SearchRules,
    /// Expiry as Unix seconds; omitted for tokens that never expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Optional inputs of a token generation
#[derive(Debug, Clone, Default)]
pub struct TenantTokenOptions {
    /// Signing secret; unset or empty falls back to the client's configured API key
    pub api_key: Option<String>,
    /// Must fall in a later second than now
    pub expires_at: Option<DateTime<Utc>>,
}

impl TenantTokenOptions {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Stateless generator; the clock is the only collaborator
pub struct TenantTokenGenerator {
    time_provider: Arc<dyn TimeProvider>,
}

impl TenantTokenGenerator {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    /// Generate a signed tenant token
    ///
    /// # Arguments
    ///
    /// * `api_key_uid` - uid (UUID) of the key whose secret signs the token
    /// * `search_rules` - per-index restrictions, must be non-empty
    /// * `options` - secret override and expiry
    /// * `default_secret` - secret used when `options.api_key` is unset or empty
    ///
    /// # Errors
    ///
    /// Checked in this order, before any signing:
    /// - `DomainError::MissingSigningKey` if no non-empty secret is available
    /// - `DomainError::MissingSearchRules` if rules are absent or empty
    /// - `DomainError::ExpiredToken` if `expires_at` does not fall in a later
    ///   second than now (`exp` is encoded in whole seconds)
    /// - `DomainError::InvalidApiKeyUid` if `api_key_uid` is not a UUID
    pub fn generate(
        &self,
        api_key_uid: &str,
        search_rules: Option<&SearchRules>,
        options: &TenantTokenOptions,
        default_secret: Option<&str>,
    ) -> Result<String> {
        let secret = options
            .api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(default_secret.filter(|s| !s.is_empty()))
            .ok_or(DomainError::MissingSigningKey)?;

        let search_rules = search_rules
            .filter(|rules| !rules.is_empty())
            .ok_or(DomainError::MissingSearchRules)?;

        // `exp` is whole seconds, so the check is too
        if let Some(expires_at) = options.expires_at {
            let now_secs = self.time_provider.now_millis().div_euclid(1000);
            if expires_at.timestamp() <= now_secs {
                return Err(DomainError::ExpiredToken {
                    expires_at: expires_at.timestamp(),
                });
            }
        }

        if Uuid::parse_str(api_key_uid).is_err() {
            return Err(DomainError::InvalidApiKeyUid(api_key_uid.to_string()));
        }

        let claims = TenantTokenClaims {
            api_key_uid: api_key_uid.to_string(),
            search_rules: search_rules.clone(),
            exp: options.expires_at.map(|t| t.timestamp()),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| DomainError::Signing(e.to_string()))?;

        debug!(
            api_key_uid = %api_key_uid,
            rules = search_rules.len(),
            exp = ?claims.exp,
            "Tenant token generated"
        );

        Ok(token)
    }
}

/// Verify a tenant token with its signing secret and return its claims
///
/// Rejects bad signatures, malformed tokens, and expired `exp` claims. Tokens
/// without `exp` never expire.
pub fn decode_tenant_token(token: &str, secret: &str) -> Result<TenantTokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<TenantTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| DomainError::Verification(e.to_string()))
}
