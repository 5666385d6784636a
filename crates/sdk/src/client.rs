//! Meili Client Implementation

use crate::config::ClientConfig;
use crate::error::Result;
use crate::index::Index;
use meili_core::application::api;
use meili_core::application::{
    TaskApi, TaskPoller, TenantTokenGenerator, TenantTokenOptions, WaitParams,
};
use meili_core::domain::{
    Health, IndexConfig, IndexInfo, IndexesResults, Key, KeyCreate, KeyUpdate, KeysQuery,
    KeysResults, SearchRules, Stats, Task, TaskInfo, TaskUid, TasksQuery, TasksResults, Version,
};
use meili_core::port::{HttpMethod, HttpRequest, SystemTimeProvider, TimeProvider, Transport};
use meili_infra_http::ReqwestTransport;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// Meilisearch client
///
/// Cheap to clone; clones share the HTTP connection pool and configuration.
///
/// # Example
///
/// ```no_run
/// use meili_sdk::{Client, ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new(ClientConfig::new("http://localhost:7700").with_api_key("masterKey"))?;
/// let version = client.version().await?;
/// println!("Meilisearch {}", version.pkg_version);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    tasks: TaskApi,
    poller: Arc<TaskPoller>,
    tokens: Arc<TenantTokenGenerator>,
}

impl Client {
    /// Create a client talking HTTP to `config.host`
    ///
    /// # Errors
    /// `SdkError::Config` if the config is invalid, `SdkError::InvalidRequest`
    /// if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.http_settings())?;
        info!(host = %config.host, "Meili client created");
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over any `Transport` implementation
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let tasks = TaskApi::new(Arc::clone(&transport));
        let poller = TaskPoller::with_defaults(
            Arc::new(tasks.clone()),
            config.wait_interval(),
            config.wait_timeout(),
        );

        Self {
            config: Arc::new(config),
            transport,
            tasks,
            poller: Arc::new(poller),
            tokens: Arc::new(TenantTokenGenerator::new(Arc::new(SystemTimeProvider))),
        }
    }

    /// Replace the clock used to validate tenant token expiry
    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.tokens = Arc::new(TenantTokenGenerator::new(time_provider));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) async fn call<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        Ok(api::send(self.transport.as_ref(), request).await?)
    }

    // ------------------------------------------------------------------
    // Instance
    // ------------------------------------------------------------------

    pub async fn version(&self) -> Result<Version> {
        self.call(HttpRequest::get("/version")).await
    }

    pub async fn health(&self) -> Result<Health> {
        self.call(HttpRequest::get("/health")).await
    }

    /// `true` only if the server answers `available`; any error counts as unhealthy
    pub async fn is_healthy(&self) -> bool {
        match self.health().await {
            Ok(health) => health.is_available(),
            Err(e) => {
                debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.call(HttpRequest::get("/stats")).await
    }

    /// Trigger a dump; returns the enqueued dump task
    pub async fn create_dump(&self) -> Result<TaskInfo> {
        self.call(HttpRequest::new(HttpMethod::Post, "/dumps")).await
    }

    // ------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------

    pub async fn get_keys(&self, query: &KeysQuery) -> Result<KeysResults> {
        self.call(HttpRequest::get("/keys").with_query(query.to_query_pairs()))
            .await
    }

    /// Fetch a key by its `key` value or its `uid`
    pub async fn get_key(&self, key_or_uid: &str) -> Result<Key> {
        self.call(HttpRequest::get(format!("/keys/{key_or_uid}"))).await
    }

    pub async fn create_key(&self, key: &KeyCreate) -> Result<Key> {
        self.call(HttpRequest::post("/keys", serde_json::to_value(key)?))
            .await
    }

    /// Update a key's name and description
    pub async fn update_key(&self, key_or_uid: &str, update: &KeyUpdate) -> Result<Key> {
        self.call(HttpRequest::patch(
            format!("/keys/{key_or_uid}"),
            serde_json::to_value(update)?,
        ))
        .await
    }

    /// Delete a key; errors with `SdkError::Api` (404) if it does not exist
    pub async fn delete_key(&self, key_or_uid: &str) -> Result<bool> {
        api::send_no_content(
            self.transport.as_ref(),
            HttpRequest::delete(format!("/keys/{key_or_uid}")),
        )
        .await?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    pub async fn create_index(&self, config: &IndexConfig) -> Result<TaskInfo> {
        self.call(HttpRequest::post("/indexes", serde_json::to_value(config)?))
            .await
    }

    pub async fn get_index(&self, uid: &str) -> Result<IndexInfo> {
        self.call(HttpRequest::get(format!("/indexes/{uid}"))).await
    }

    pub async fn get_indexes(&self) -> Result<IndexesResults> {
        self.call(HttpRequest::get("/indexes")).await
    }

    pub async fn delete_index(&self, uid: &str) -> Result<TaskInfo> {
        self.call(HttpRequest::delete(format!("/indexes/{uid}"))).await
    }

    /// Handle on an index; no request is made
    pub fn index(&self, uid: impl Into<String>) -> Index {
        Index::new(uid.into(), self.clone())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn get_task(&self, uid: TaskUid) -> Result<Task> {
        Ok(self.tasks.get_task(uid).await?)
    }

    pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksResults> {
        Ok(self.tasks.get_tasks(query).await?)
    }

    /// Poll task `uid` until it is `succeeded`, `failed` or `canceled`
    ///
    /// Unset parameters fall back to `config.wait`. A failed task is returned
    /// as `Ok`; inspect `task.status` and `task.error`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use meili_sdk::{Client, ClientConfig, WaitParams};
    /// # use std::time::Duration;
    /// # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let info = client.create_dump().await?;
    /// let task = client
    ///     .wait_for_task(info.task_uid, WaitParams::new().with_timeout(Duration::from_secs(60)))
    ///     .await?;
    /// println!("dump {}", task.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_task(&self, uid: TaskUid, params: WaitParams) -> Result<Task> {
        Ok(self.poller.wait_for_task(uid, params).await?)
    }

    // ------------------------------------------------------------------
    // Tenant tokens
    // ------------------------------------------------------------------

    /// Sign a tenant token locally (no request is made)
    ///
    /// The secret is `options.api_key`, or the configured API key when unset.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use meili_sdk::{Client, SearchRule, SearchRules, TenantTokenOptions};
    /// # fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let rules = SearchRules::new().with_index("books", SearchRule::filter("user_id = 1"));
    /// let token = client.generate_tenant_token(
    ///     "6062abda-a5aa-4414-ac91-ecd7944c0f8d",
    ///     Some(&rules),
    ///     &TenantTokenOptions::default(),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn generate_tenant_token(
        &self,
        api_key_uid: &str,
        search_rules: Option<&SearchRules>,
        options: &TenantTokenOptions,
    ) -> Result<String> {
        Ok(self.tokens.generate(
            api_key_uid,
            search_rules,
            options,
            self.config.api_key.as_deref(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use meili_core::application::decode_tenant_token;
    use meili_core::domain::{DomainError, SearchRule, TaskStatus};
    use meili_core::port::transport::mocks::RecordingTransport;
    use meili_core::port::{FixedTimeProvider, TransportError};
    use serde_json::json;
    use std::time::Duration;

    fn client_with(transport: &Arc<RecordingTransport>) -> Client {
        Client::with_transport(
            ClientConfig::new("http://localhost:7700").with_api_key("masterKey"),
            transport.clone(),
        )
    }

    fn task_info(uid: i64, task_type: &str) -> serde_json::Value {
        json!({
            "taskUid": uid,
            "indexUid": null,
            "status": "enqueued",
            "type": task_type,
            "enqueuedAt": "2024-05-01T10:00:00Z"
        })
    }

    fn task(uid: i64, status: &str) -> serde_json::Value {
        json!({
            "uid": uid,
            "indexUid": "movies",
            "status": status,
            "type": "indexCreation",
            "enqueuedAt": "2024-05-01T10:00:00Z"
        })
    }

    fn key_body(uid: &str) -> serde_json::Value {
        json!({
            "uid": uid,
            "key": "d0552b41536279a0ad88bd595327b96f01176a60c2243e906c52ac02375f9bc4",
            "name": "Search key",
            "description": null,
            "actions": ["search"],
            "indexes": ["*"],
            "expiresAt": null,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        })
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Client::new(ClientConfig::new(""));
        assert!(matches!(result, Err(SdkError::Config(_))));
    }

    #[tokio::test]
    async fn test_version_and_health() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(
            200,
            json!({"commitSha": "b46889b5", "commitDate": "2024-05-01", "pkgVersion": "1.8.0"}),
        );
        transport.push_response(200, json!({"status": "available"}));
        let client = client_with(&transport);

        assert_eq!(client.version().await.unwrap().pkg_version, "1.8.0");
        assert!(client.is_healthy().await);

        let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/version", "/health"]);
    }

    #[tokio::test]
    async fn test_is_healthy_false_on_error() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_error(TransportError::Communication("connection refused".into()));
        let client = client_with(&transport);

        assert!(!client.is_healthy().await);
    }

    #[tokio::test]
    async fn test_create_dump() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(202, task_info(12, "dumpCreation"));
        let client = client_with(&transport);

        let info = client.create_dump().await.unwrap();

        assert_eq!(info.task_uid, 12);
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/dumps");
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_key_crud() {
        let uid = "6062abda-a5aa-4414-ac91-ecd7944c0f8d";
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(201, key_body(uid));
        transport.push_response(200, key_body(uid));
        transport.push_empty(204);
        let client = client_with(&transport);

        let mut create = KeyCreate::new(["search"], ["*"]);
        create.name = Some("Search key".into());
        let key = client.create_key(&create).await.unwrap();
        assert_eq!(key.uid, uid);

        let update = KeyUpdate {
            name: Some("Renamed".into()),
            description: None,
        };
        client.update_key(uid, &update).await.unwrap();
        assert!(client.delete_key(uid).await.unwrap());

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].body.as_ref().unwrap()["expiresAt"], json!(null));
        assert_eq!(requests[1].method, HttpMethod::Patch);
        assert_eq!(requests[1].path, format!("/keys/{uid}"));
        assert_eq!(requests[1].body, Some(json!({"name": "Renamed"})));
        assert_eq!(requests[2].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_api_error() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(
            404,
            json!({
                "message": "API key `nope` not found.",
                "code": "api_key_not_found",
                "type": "invalid_request",
                "link": "https://docs.meilisearch.com/errors#api_key_not_found"
            }),
        );
        let client = client_with(&transport);

        let err = client.delete_key("nope").await.unwrap_err();

        let api = err.api_error().unwrap();
        assert_eq!(api.status, 404);
        assert_eq!(api.code, "api_key_not_found");
    }

    #[tokio::test]
    async fn test_create_index_sends_config() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(202, task_info(1, "indexCreation"));
        let client = client_with(&transport);

        client
            .create_index(&IndexConfig::new("movies").with_primary_key("id"))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/indexes");
        assert_eq!(
            request.body,
            Some(json!({"uid": "movies", "primaryKey": "id"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_task_uses_config_defaults() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(200, task(1, "enqueued"));
        transport.push_response(200, task(1, "processing"));
        transport.push_response(200, task(1, "succeeded"));
        let client = client_with(&transport);

        let task = client.wait_for_task(1, WaitParams::new()).await.unwrap();

        assert_eq!(task.status, TaskStatus::Succeeded);
        assert_eq!(transport.requests().len(), 3);
        assert!(transport.requests().iter().all(|r| r.path == "/tasks/1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_task_timeout_maps_to_sdk_error() {
        let transport = Arc::new(RecordingTransport::new());
        for _ in 0..10 {
            transport.push_response(200, task(2, "processing"));
        }
        let client = client_with(&transport);

        let err = client
            .wait_for_task(
                2,
                WaitParams::new()
                    .with_interval(Duration::from_millis(50))
                    .with_timeout(Duration::from_millis(120)),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SdkError::WaitTimeout {
                task_uid: 2,
                last_status: Some(TaskStatus::Processing)
            }
        ));
    }

    #[test]
    fn test_generate_tenant_token_falls_back_to_api_key() {
        let transport = Arc::new(RecordingTransport::new());
        let client = client_with(&transport)
            .with_time_provider(Arc::new(FixedTimeProvider(1_700_000_000_000)));
        let rules = SearchRules::new().with_index("books", SearchRule::filter("user_id = 1"));

        let token = client
            .generate_tenant_token(
                "6062abda-a5aa-4414-ac91-ecd7944c0f8d",
                Some(&rules),
                &TenantTokenOptions::default(),
            )
            .unwrap();

        let claims = decode_tenant_token(&token, "masterKey").unwrap();
        assert_eq!(claims.search_rules, rules);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_generate_tenant_token_without_any_key() {
        let transport = Arc::new(RecordingTransport::new());
        let client = Client::with_transport(ClientConfig::default(), transport);

        let err = client
            .generate_tenant_token(
                "6062abda-a5aa-4414-ac91-ecd7944c0f8d",
                Some(&SearchRules::all_indexes()),
                &TenantTokenOptions::default(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            SdkError::TenantToken(DomainError::MissingSigningKey)
        ));
    }
}
