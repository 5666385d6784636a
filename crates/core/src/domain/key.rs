// API Key Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API key as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub uid: String,
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub actions: Vec<String>,
    pub indexes: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /keys`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub actions: Vec<String>,
    pub indexes: Vec<String>,
    /// Always sent; `null` means the key never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl KeyCreate {
    pub fn new<A, I>(actions: A, indexes: I) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            indexes: indexes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Body of `PATCH /keys/{key}` (only name and description are mutable)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Pagination for `GET /keys`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeysQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl KeysQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

/// Page of keys
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeysResults {
    pub results: Vec<Key>,
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}
