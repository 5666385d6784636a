//! Client operations over the real HTTP transport

mod common;

use common::{accepted, client, task_body, SEARCH_KEY_UID};
use meili_infra_http::CLIENT_AGENT_HEADER;
use meili_sdk::{
    Client, ClientConfig, IndexConfig, KeyCreate, KeysQuery, SdkError, SearchRequest, TaskStatus,
    TaskType, TasksQuery, WaitParams,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Movie {
    id: u32,
    title: String,
    year: u16,
}

#[tokio::test]
async fn test_instance_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header_exists(CLIENT_AGENT_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "available"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commitSha": "b46889b5f0f2f8b91438a08a358ba8f05fc09fc1",
            "commitDate": "2024-05-01T10:00:00Z",
            "pkgVersion": "1.8.0"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "databaseSize": 447819776,
            "lastUpdate": "2024-05-01T10:00:02Z",
            "indexes": {
                "movies": {
                    "numberOfDocuments": 19654,
                    "isIndexing": false,
                    "fieldDistribution": {"id": 19654, "title": 19654}
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client(&server);

    assert!(client.is_healthy().await);
    assert_eq!(client.version().await.unwrap().pkg_version, "1.8.0");
    let stats = client.stats().await.unwrap();
    assert_eq!(stats.indexes["movies"].number_of_documents, 19654);
}

#[tokio::test]
async fn test_unreachable_server_is_unhealthy() {
    let client = Client::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();

    assert!(!client.is_healthy().await);
    let err = client.version().await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Connection(_) | SdkError::Timeout(_)
    ));
}

#[tokio::test]
async fn test_index_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(body_json(json!({"uid": "movies", "primaryKey": "id"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(accepted(1, "indexCreation")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "movies",
            "primaryKey": "id",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:01Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "offset": 0,
            "limit": 20,
            "total": 0
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/indexes/movies"))
        .respond_with(ResponseTemplate::new(202).set_body_json(accepted(2, "indexDeletion")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let info = client
        .create_index(&IndexConfig::new("movies").with_primary_key("id"))
        .await
        .unwrap();
    assert_eq!(info.task_type, TaskType::IndexCreation);

    let index = client.get_index("movies").await.unwrap();
    assert_eq!(index.primary_key.as_deref(), Some("id"));
    assert_eq!(client.get_indexes().await.unwrap().total, 0);

    let info = client.delete_index("movies").await.unwrap();
    assert_eq!(info.task_uid, 2);
}

#[tokio::test]
async fn test_add_documents_then_wait_and_search() {
    let server = MockServer::start().await;
    let movies = vec![
        Movie {
            id: 1,
            title: "Carol".into(),
            year: 2015,
        },
        Movie {
            id: 2,
            title: "Wonder Woman".into(),
            year: 2017,
        },
    ];
    Mock::given(method("POST"))
        .and(path("/indexes/movies/documents"))
        .and(query_param("primaryKey", "id"))
        .and(body_json(&movies))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(accepted(3, "documentAdditionOrUpdate")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(common::StatusSequence::new(3, vec!["processing", "succeeded"]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes/movies/search"))
        .and(body_json(json!({"q": "wonder", "filter": "year > 2016", "limit": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{"id": 2, "title": "Wonder Woman", "year": 2017}],
            "estimatedTotalHits": 1,
            "offset": 0,
            "limit": 5,
            "processingTimeMs": 1,
            "query": "wonder"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/movies/documents/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 2, "title": "Wonder Woman", "year": 2017})),
        )
        .mount(&server)
        .await;

    let index = client(&server).index("movies");

    let info = index.add_documents(&movies, Some("id")).await.unwrap();
    let task = index
        .wait_for_task(
            info.task_uid,
            WaitParams::new().with_interval(Duration::from_millis(10)),
        )
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Succeeded);

    let results = index
        .search(
            &SearchRequest::new("wonder")
                .with_filter("year > 2016")
                .with_limit(5),
        )
        .await
        .unwrap();
    assert_eq!(results.estimated_total_hits, 1);
    assert_eq!(results.hits[0]["title"], "Wonder Woman");

    let movie: Movie = index.get_document("2").await.unwrap();
    assert_eq!(movie, movies.into_iter().nth(1).unwrap());
}

#[tokio::test]
async fn test_tasks_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("statuses", "failed,canceled"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [task_body(5, "failed"), task_body(4, "canceled")],
            "limit": 2,
            "from": 5,
            "next": 3
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .get_tasks(
            &TasksQuery::new()
                .with_limit(2)
                .with_statuses([TaskStatus::Failed, TaskStatus::Canceled]),
        )
        .await
        .unwrap();

    assert_eq!(page.results.len(), 2);
    assert_eq!(page.next, Some(3));
    assert!(page.results[0].error.is_some());
}

#[tokio::test]
async fn test_keys() {
    let server = MockServer::start().await;
    let key = json!({
        "uid": SEARCH_KEY_UID,
        "key": common::SEARCH_KEY,
        "name": "Default Search API Key",
        "description": "Use it to search from the frontend",
        "actions": ["search"],
        "indexes": ["*"],
        "expiresAt": null,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z"
    });
    Mock::given(method("GET"))
        .and(path("/keys"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [key.clone()],
            "offset": 0,
            "limit": 10,
            "total": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/keys"))
        .and(body_json(json!({
            "actions": ["search"],
            "indexes": ["*"],
            "expiresAt": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(key.clone()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/keys/{SEARCH_KEY_UID}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client(&server);

    let keys = client
        .get_keys(&KeysQuery {
            limit: Some(10),
            offset: None,
        })
        .await
        .unwrap();
    assert_eq!(keys.total, 1);
    assert_eq!(keys.results[0].uid, SEARCH_KEY_UID);

    let created = client
        .create_key(&KeyCreate::new(["search"], ["*"]))
        .await
        .unwrap();
    assert_eq!(created.actions, vec!["search"]);

    assert!(client.delete_key(SEARCH_KEY_UID).await.unwrap());
}

#[tokio::test]
async fn test_error_body_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Index `missing` not found.",
            "code": "index_not_found",
            "type": "invalid_request",
            "link": "https://docs.meilisearch.com/errors#index_not_found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client(&server);

    let err = client.get_index("missing").await.unwrap_err();
    let api = err.api_error().unwrap();
    assert_eq!(api.status, 404);
    assert_eq!(api.code, "index_not_found");
    assert_eq!(api.error_type, "invalid_request");

    let err = client.stats().await.unwrap_err();
    let api = err.api_error().unwrap();
    assert_eq!(api.status, 502);
    assert!(api.message.contains("Bad Gateway"));
}
