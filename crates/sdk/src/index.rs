//! Index handle
//!
//! Writes are asynchronous on the server: they return a `TaskInfo` whose
//! `task_uid` can be handed to `wait_for_task`.

use crate::client::Client;
use crate::error::Result;
use meili_core::application::WaitParams;
use meili_core::domain::{
    IndexStats, SearchRequest, SearchResponse, Task, TaskInfo, TaskUid, TasksQuery, TasksResults,
};
use meili_core::port::HttpRequest;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Handle on one index
#[derive(Clone)]
pub struct Index {
    uid: String,
    client: Client,
}

impl Index {
    pub(crate) fn new(uid: String, client: Client) -> Self {
        Self { uid, client }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    fn path(&self, suffix: &str) -> String {
        format!("/indexes/{}{}", self.uid, suffix)
    }

    fn with_primary_key(request: HttpRequest, primary_key: Option<&str>) -> HttpRequest {
        match primary_key {
            Some(key) => request.with_query(vec![("primaryKey".to_string(), key.to_string())]),
            None => request,
        }
    }

    /// Add documents, replacing any existing document with the same id
    pub async fn add_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo> {
        let request = HttpRequest::post(self.path("/documents"), serde_json::to_value(documents)?);
        self.client
            .call(Self::with_primary_key(request, primary_key))
            .await
    }

    /// Add documents, merging fields into existing documents with the same id
    pub async fn update_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo> {
        let request = HttpRequest::put(self.path("/documents"), serde_json::to_value(documents)?);
        self.client
            .call(Self::with_primary_key(request, primary_key))
            .await
    }

    pub async fn get_document<T: DeserializeOwned>(&self, document_id: &str) -> Result<T> {
        self.client
            .call(HttpRequest::get(self.path(&format!("/documents/{document_id}"))))
            .await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<TaskInfo> {
        self.client
            .call(HttpRequest::delete(
                self.path(&format!("/documents/{document_id}")),
            ))
            .await
    }

    pub async fn delete_all_documents(&self) -> Result<TaskInfo> {
        self.client
            .call(HttpRequest::delete(self.path("/documents")))
            .await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.client
            .call(HttpRequest::post(
                self.path("/search"),
                serde_json::to_value(request)?,
            ))
            .await
    }

    pub async fn get_filterable_attributes(&self) -> Result<Vec<String>> {
        self.client
            .call(HttpRequest::get(
                self.path("/settings/filterable-attributes"),
            ))
            .await
    }

    pub async fn update_filterable_attributes<I, S>(&self, attributes: I) -> Result<TaskInfo>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        self.client
            .call(HttpRequest::put(
                self.path("/settings/filterable-attributes"),
                serde_json::to_value(attributes)?,
            ))
            .await
    }

    pub async fn update_sortable_attributes<I, S>(&self, attributes: I) -> Result<TaskInfo>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        self.client
            .call(HttpRequest::put(
                self.path("/settings/sortable-attributes"),
                serde_json::to_value(attributes)?,
            ))
            .await
    }

    /// Tasks of this index, newest first
    pub async fn get_tasks(&self) -> Result<TasksResults> {
        self.client
            .get_tasks(&TasksQuery::new().with_index_uids([self.uid.as_str()]))
            .await
    }

    pub async fn wait_for_task(&self, uid: TaskUid, params: WaitParams) -> Result<Task> {
        self.client.wait_for_task(uid, params).await
    }

    pub async fn stats(&self) -> Result<IndexStats> {
        self.client.call(HttpRequest::get(self.path("/stats"))).await
    }
}
