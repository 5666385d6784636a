//! Simple SDK Example
//!
//! Demonstrates indexing, waiting on a task, searching and tenant tokens.
//!
//! # Usage
//!
//! 1. Start Meilisearch:
//!    ```bash
//!    meilisearch --master-key masterKey
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    MEILI_API_KEY=masterKey cargo run --example simple
//!    ```

use meili_sdk::{
    Client, ClientConfig, KeysQuery, SearchRequest, SearchRule, SearchRules, TenantTokenOptions,
    WaitParams,
};
use serde_json::json;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Meili SDK - Simple Example");
    println!("==========================\n");

    // 1. Connect
    println!("1. Connecting...");
    let client = Client::new(ClientConfig::load()?)?;
    let version = client.version().await?;
    println!("   ✓ Meilisearch {}\n", version.pkg_version);

    // 2. Index documents
    println!("2. Adding documents...");
    let books = client.index("books");
    let info = books
        .add_documents(
            &[
                json!({"id": 1, "title": "Dune", "user_id": 1}),
                json!({"id": 2, "title": "Hyperion", "user_id": 2}),
            ],
            Some("id"),
        )
        .await?;
    println!("   ✓ Task {} enqueued\n", info.task_uid);

    // 3. Wait for the task
    println!("3. Waiting for task {}...", info.task_uid);
    let task = books
        .wait_for_task(
            info.task_uid,
            WaitParams::new().with_timeout(Duration::from_secs(30)),
        )
        .await?;
    println!("   ✓ Task {} {}\n", task.uid, task.status);

    let info = books.update_filterable_attributes(["user_id"]).await?;
    books.wait_for_task(info.task_uid, WaitParams::new()).await?;

    // 4. Search
    println!("4. Searching...");
    let results = books.search(&SearchRequest::new("dune")).await?;
    println!("   ✓ {} hits\n", results.hits.len());

    // 5. Tenant token restricted to user 1
    println!("5. Generating a tenant token...");
    let keys = client.get_keys(&KeysQuery::default()).await?;
    let Some(key) = keys.results.first() else {
        println!("   ✗ No API key available");
        return Ok(());
    };
    let rules = SearchRules::new().with_index("books", SearchRule::filter("user_id = 1"));
    let token = client.generate_tenant_token(
        &key.uid,
        Some(&rules),
        &TenantTokenOptions::default().with_api_key(key.key.clone()),
    )?;

    let tenant = Client::new(ClientConfig::new(client.config().host.clone()).with_api_key(token))?;
    let results = tenant
        .index("books")
        .search(&SearchRequest::placeholder())
        .await?;
    println!("   ✓ Tenant sees {} hits\n", results.hits.len());

    println!("Done!");
    Ok(())
}
