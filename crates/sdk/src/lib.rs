//! Meili SDK - Rust Client Library for Meilisearch
//!
//! Wraps the REST API of a Meilisearch instance: instance info, keys,
//! indexes, documents and search. Writes are queued by the server as tasks;
//! [`Client::wait_for_task`] polls one until it settles. Tenant tokens are
//! signed locally with [`Client::generate_tenant_token`].
//!
//! # Example
//!
//! ```no_run
//! use meili_sdk::{Client, ClientConfig, SearchRequest, WaitParams};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::new("http://localhost:7700").with_api_key("masterKey"))?;
//!     let movies = client.index("movies");
//!
//!     // Index documents and wait for the server to process them
//!     let info = movies
//!         .add_documents(&[json!({"id": 1, "title": "Carol"})], Some("id"))
//!         .await?;
//!     let task = movies.wait_for_task(info.task_uid, WaitParams::new()).await?;
//!     println!("Task {} {}", task.uid, task.status);
//!
//!     let results = movies.search(&SearchRequest::new("carol")).await?;
//!     println!("{} hits", results.hits.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod index;

pub use client::Client;
pub use config::{ClientConfig, WaitConfig, ENV_PREFIX};
pub use error::{Result, SdkError};
pub use index::Index;

pub use meili_core::application::{
    cancel_channel, decode_tenant_token, CancelHandle, CancelSignal, TenantTokenClaims,
    TenantTokenOptions, WaitParams,
};
pub use meili_core::domain::{
    Health, IndexConfig, IndexInfo, IndexStats, IndexesResults, Key, KeyCreate, KeyUpdate,
    KeysQuery, KeysResults, MatchingStrategy, SearchRequest, SearchResponse, SearchRule,
    SearchRules, Stats, Task, TaskDetails, TaskError, TaskInfo, TaskStatus, TaskType, TaskUid,
    TasksQuery, TasksResults, Version, ALL_INDEXES,
};
pub use meili_core::ApiError;
