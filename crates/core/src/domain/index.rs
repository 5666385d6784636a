// Index Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Index uid
pub type IndexUid = String;

/// Index metadata returned by `GET /indexes/{uid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    pub uid: IndexUid,
    #[serde(default)]
    pub primary_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /indexes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    pub uid: IndexUid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

impl IndexConfig {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            primary_key: None,
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }
}

/// Page of indexes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexesResults {
    pub results: Vec<IndexInfo>,
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}
