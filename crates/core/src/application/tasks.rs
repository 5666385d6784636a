// Task API - reads of the server-side task queue

use crate::application::api;
use crate::domain::{Task, TaskUid, TasksQuery, TasksResults};
use crate::error::Result;
use crate::port::{HttpRequest, TaskFetcher, Transport};
use async_trait::async_trait;
use std::sync::Arc;

/// HTTP-backed task reads (`GET /tasks`, `GET /tasks/{uid}`)
#[derive(Clone)]
pub struct TaskApi {
    transport: Arc<dyn Transport>,
}

impl TaskApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_task(&self, uid: TaskUid) -> Result<Task> {
        api::send(self.transport.as_ref(), HttpRequest::get(format!("/tasks/{uid}"))).await
    }

    pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksResults> {
        let request = HttpRequest::get("/tasks").with_query(query.to_query_pairs());
        api::send(self.transport.as_ref(), request).await
    }
}

#[async_trait]
impl TaskFetcher for TaskApi {
    async fn fetch_task(&self, uid: TaskUid) -> Result<Task> {
        self.get_task(uid).await
    }
}
