// Task Domain Model
//
// Tasks are created and advanced by the server. The client only observes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task uid, assigned by the server in enqueue order
pub type TaskUid = i64;

/// Task status
///
/// `Enqueued` and `Processing` are transient; the other three are terminal and
/// never change once reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Enqueued => "enqueued",
            TaskStatus::Processing => "processing",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation kind of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    IndexCreation,
    IndexUpdate,
    IndexDeletion,
    IndexSwap,
    DocumentAdditionOrUpdate,
    DocumentDeletion,
    SettingsUpdate,
    DumpCreation,
    TaskCancelation,
    TaskDeletion,
    SnapshotCreation,
    /// Kinds added by newer servers
    #[serde(other)]
    Unknown,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::IndexCreation => "indexCreation",
            TaskType::IndexUpdate => "indexUpdate",
            TaskType::IndexDeletion => "indexDeletion",
            TaskType::IndexSwap => "indexSwap",
            TaskType::DocumentAdditionOrUpdate => "documentAdditionOrUpdate",
            TaskType::DocumentDeletion => "documentDeletion",
            TaskType::SettingsUpdate => "settingsUpdate",
            TaskType::DumpCreation => "dumpCreation",
            TaskType::TaskCancelation => "taskCancelation",
            TaskType::TaskDeletion => "taskDeletion",
            TaskType::SnapshotCreation => "snapshotCreation",
            TaskType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation-specific counters, present once processing has begun
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_documents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_documents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_documents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provided_ids: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dump_uid: Option<String>,
}

/// Error reported by a task that ended in `failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub link: String,
}

/// Task as returned by `GET /tasks/{uid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub uid: TaskUid,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(default)]
    pub details: Option<TaskDetails>,
    #[serde(default)]
    pub error: Option<TaskError>,
    #[serde(default)]
    pub duration: Option<String>,
    pub enqueued_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }
}

/// Descriptor returned immediately by every mutating call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub task_uid: TaskUid,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub enqueued_at: DateTime<Utc>,
}

/// Filters for `GET /tasks`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksQuery {
    pub limit: Option<i64>,
    pub from: Option<i64>,
    pub index_uids: Vec<String>,
    pub statuses: Vec<TaskStatus>,
    pub types: Vec<TaskType>,
}

impl TasksQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_from(mut self, from: i64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_index_uids<I, S>(mut self, uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_uids = uids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Render as query-string pairs (lists are comma-joined)
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from".to_string(), from.to_string()));
        }
        if !self.index_uids.is_empty() {
            pairs.push(("indexUids".to_string(), self.index_uids.join(",")));
        }
        if !self.statuses.is_empty() {
            let joined: Vec<&str> = self.statuses.iter().map(|s| s.as_str()).collect();
            pairs.push(("statuses".to_string(), joined.join(",")));
        }
        if !self.types.is_empty() {
            let joined: Vec<&str> = self.types.iter().map(|t| t.as_str()).collect();
            pairs.push(("types".to_string(), joined.join(",")));
        }
        pairs
    }
}

/// Page of tasks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TasksResults {
    pub results: Vec<Task>,
    pub limit: i64,
    #[serde(default)]
    pub from: Option<i64>,
    #[serde(default)]
    pub next: Option<i64>,
}
