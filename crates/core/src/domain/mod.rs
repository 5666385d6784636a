// Domain Layer - Pure data model of the search service

pub mod error;
pub mod index;
pub mod instance;
pub mod key;
pub mod search;
pub mod search_rules;
pub mod task;

// Re-exports
pub use error::DomainError;
pub use index::{IndexConfig, IndexInfo, IndexUid, IndexesResults};
pub use instance::{Health, IndexStats, Stats, Version};
pub use key::{Key, KeyCreate, KeyUpdate, KeysQuery, KeysResults};
pub use search::{MatchingStrategy, SearchRequest, SearchResponse};
pub use search_rules::{SearchRule, SearchRules, ALL_INDEXES};
pub use task::{
    Task, TaskDetails, TaskError, TaskInfo, TaskStatus, TaskType, TaskUid, TasksQuery,
    TasksResults,
};
