//! Shared wiremock fixtures

#![allow(dead_code)]

use meili_sdk::{Client, ClientConfig};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const MASTER_KEY: &str = "masterKey";
pub const SEARCH_KEY_UID: &str = "6062abda-a5aa-4414-ac91-ecd7944c0f8d";
pub const SEARCH_KEY: &str = "d0552b41536279a0ad88bd595327b96f01176a60c2243e906c52ac02375f9bc4";

pub fn client(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(server.uri()).with_api_key(MASTER_KEY)).unwrap()
}

pub fn task_body(uid: i64, status: &str) -> Value {
    let mut body = json!({
        "uid": uid,
        "indexUid": "movies",
        "status": status,
        "type": "documentAdditionOrUpdate",
        "details": {"receivedDocuments": 2, "indexedDocuments": null},
        "enqueuedAt": "2024-05-01T10:00:00Z",
        "startedAt": null,
        "finishedAt": null
    });
    if status == "failed" {
        body["error"] = json!({
            "message": "The primary key inference failed.",
            "code": "index_primary_key_no_candidate_found",
            "type": "invalid_request",
            "link": "https://docs.meilisearch.com/errors#index_primary_key_no_candidate_found"
        });
    }
    body
}

pub fn accepted(uid: i64, task_type: &str) -> Value {
    json!({
        "taskUid": uid,
        "indexUid": "movies",
        "status": "enqueued",
        "type": task_type,
        "enqueuedAt": "2024-05-01T10:00:00Z"
    })
}

/// Serves the statuses in order, one per request; the last one repeats
pub struct StatusSequence {
    uid: i64,
    statuses: Vec<&'static str>,
    calls: AtomicUsize,
}

impl StatusSequence {
    pub fn new(uid: i64, statuses: Vec<&'static str>) -> Self {
        Self {
            uid,
            statuses,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let status = self.statuses[call.min(self.statuses.len() - 1)];
        ResponseTemplate::new(200).set_body_json(task_body(self.uid, status))
    }
}

/// Serves the status reached at the time of each request
///
/// Status is `enqueued` until the first transition.
pub struct StatusTimeline {
    uid: i64,
    start: Instant,
    transitions: Vec<(Duration, &'static str)>,
}

impl StatusTimeline {
    pub fn new(uid: i64, transitions: Vec<(Duration, &'static str)>) -> Self {
        Self {
            uid,
            start: Instant::now(),
            transitions,
        }
    }
}

impl Respond for StatusTimeline {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let elapsed = self.start.elapsed();
        let status = self
            .transitions
            .iter()
            .rev()
            .find(|(at, _)| elapsed >= *at)
            .map(|(_, status)| *status)
            .unwrap_or("enqueued");
        ResponseTemplate::new(200).set_body_json(task_body(self.uid, status))
    }
}
