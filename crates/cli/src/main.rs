//! Meili CLI - Command-line interface for a Meilisearch instance

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use meili_sdk::{
    cancel_channel, CancelSignal, Client, ClientConfig, KeysQuery, SearchRequest, SearchRules, Task, TaskStatus,
    TasksQuery, TenantTokenOptions, WaitConfig, WaitParams,
};
use std::path::PathBuf;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "meili")]
#[command(about = "Meilisearch CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: platform config dir, meili/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server URL, overrides MEILI_HOST and the config file
    #[arg(long, global = true)]
    host: Option<String>,

    /// API key or tenant token, overrides MEILI_API_KEY and the config file
    #[arg(long, global = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server availability
    Health,

    /// Show server version
    Version,

    /// Show database and index statistics
    Stats,

    /// Inspect and wait for tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Sign a tenant token locally
    Token {
        /// Uid of the API key the token is derived from
        api_key_uid: String,

        /// Search rules as JSON, e.g. '{"books": {"filter": "user_id = 1"}}'
        #[arg(short, long, default_value = r#"{"*": {}}"#)]
        rules: String,

        /// Token lifetime in seconds (no expiry if unset)
        #[arg(long)]
        expires_in_secs: Option<i64>,

        /// Signing secret (default: the configured API key)
        #[arg(long, env = "MEILI_TOKEN_SECRET")]
        secret: Option<String>,
    },

    /// Search an index
    Search {
        /// Index uid
        index: String,

        /// Query string (placeholder search if omitted)
        query: Option<String>,

        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Filter expression, e.g. "year > 2000"
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Manage API keys
    Keys {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Trigger a database dump
    Dump {
        /// Wait for the dump task to finish
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Show one task
    Get { uid: i64 },

    /// List recent tasks
    List {
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Start listing from this task uid (see "More:")
        #[arg(long)]
        from: Option<i64>,

        /// Only tasks of this index
        #[arg(short, long)]
        index: Option<String>,
    },

    /// Wait until a task is succeeded, failed or canceled (Ctrl-C to stop)
    Wait {
        uid: i64,

        #[arg(long)]
        interval_ms: Option<u64>,

        /// Give up after this long (default: the configured wait timeout)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// List API keys
    List {
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Tabled)]
struct TaskRow {
    uid: i64,
    index: String,
    #[tabled(rename = "type")]
    task_type: String,
    status: String,
    enqueued_at: String,
    duration: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            uid: task.uid,
            index: task.index_uid.clone().unwrap_or_else(|| "-".to_string()),
            task_type: task.task_type.to_string(),
            status: task.status.to_string(),
            enqueued_at: task.enqueued_at.to_rfc3339(),
            duration: task.duration.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct KeyRow {
    uid: String,
    name: String,
    actions: String,
    indexes: String,
    expires_at: String,
}

#[derive(Tabled)]
struct IndexStatsRow {
    index: String,
    documents: i64,
    indexing: bool,
}

fn init_tracing() {
    // Format: MEILI_LOG_FORMAT=json|pretty (default: pretty), always on stderr
    let log_format = std::env::var("MEILI_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meili=info"));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(Some(path.as_path())),
        None => ClientConfig::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.api_key = Some(api_key.clone());
    }
    Ok(config)
}

fn colored_status(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Succeeded => status.as_str().green(),
        TaskStatus::Failed => status.as_str().red(),
        TaskStatus::Canceled => status.as_str().yellow(),
        TaskStatus::Enqueued | TaskStatus::Processing => status.as_str().cyan(),
    }
}

fn print_task(task: &Task) {
    println!("{}", Table::new(vec![TaskRow::from(task)]));
    if let Some(error) = &task.error {
        println!();
        println!("  {} {} ({})", "Error:".bold(), error.message, error.code);
        if !error.link.is_empty() {
            println!("  {} {}", "Docs:".bold(), error.link);
        }
    }
}

/// Ctrl-C cancels the wait; the deadline still defaults to the configured one
fn wait_params(
    wait: &WaitConfig,
    interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
    signal: CancelSignal,
) -> WaitParams {
    let mut params = WaitParams::new()
        .with_cancel(signal)
        .with_timeout(Duration::from_millis(timeout_ms.unwrap_or(wait.timeout_ms)));
    if let Some(ms) = interval_ms {
        params = params.with_interval(Duration::from_millis(ms));
    }
    params
}

async fn wait_task(
    client: &Client,
    uid: i64,
    interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let (handle, signal) = cancel_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, cancelling wait");
            handle.cancel();
        }
    });

    let params = wait_params(&client.config().wait, interval_ms, timeout_ms, signal);

    println!("{}", format!("Waiting for task {uid}...").cyan());
    let task = client
        .wait_for_task(uid, params)
        .await
        .with_context(|| format!("Failed to wait for task {uid}"))?;

    println!(
        "{} task {} {}",
        "✓".green().bold(),
        uid,
        colored_status(task.status)
    );
    println!();
    print_task(&task);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli)?;
    info!(host = %config.host, "Using Meilisearch instance");
    let client = Client::new(config).context("Failed to create client")?;

    match cli.command {
        Commands::Health => {
            if client.is_healthy().await {
                println!("  {} {}", "Status:".bold(), "AVAILABLE".green());
            } else {
                println!("  {} {}", "Status:".bold(), "UNAVAILABLE".red());
                std::process::exit(1);
            }
        }

        Commands::Version => {
            let version = client.version().await.context("Failed to fetch version")?;
            println!("  {} {}", "Version:".bold(), version.pkg_version);
            println!("  {} {}", "Commit:".bold(), version.commit_sha);
            println!("  {} {}", "Date:".bold(), version.commit_date);
        }

        Commands::Stats => {
            let stats = client.stats().await.context("Failed to fetch stats")?;
            println!("{}", "Instance Stats".cyan().bold());
            println!();
            let db_mb = stats.database_size as f64 / (1024.0 * 1024.0);
            println!("  {} {:.2} MB", "DB Size:".bold(), db_mb);
            if let Some(last_update) = stats.last_update {
                println!("  {} {}", "Last Update:".bold(), last_update.to_rfc3339());
            }
            println!();

            let rows: Vec<IndexStatsRow> = stats
                .indexes
                .iter()
                .map(|(uid, index)| IndexStatsRow {
                    index: uid.clone(),
                    documents: index.number_of_documents,
                    indexing: index.is_indexing,
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Task { command } => match command {
            TaskCommands::Get { uid } => {
                let task = client
                    .get_task(uid)
                    .await
                    .with_context(|| format!("Failed to fetch task {uid}"))?;
                print_task(&task);
            }
            TaskCommands::List { limit, from, index } => {
                let mut query = TasksQuery::new().with_limit(limit);
                if let Some(from) = from {
                    query = query.with_from(from);
                }
                if let Some(index) = index {
                    query = query.with_index_uids([index]);
                }
                let page = client
                    .get_tasks(&query)
                    .await
                    .context("Failed to list tasks")?;
                let rows: Vec<TaskRow> = page.results.iter().map(TaskRow::from).collect();
                println!("{}", Table::new(rows));
                if let Some(next) = page.next {
                    println!("  {} --from {}", "More:".bold(), next);
                }
            }
            TaskCommands::Wait {
                uid,
                interval_ms,
                timeout_ms,
            } => wait_task(&client, uid, interval_ms, timeout_ms).await?,
        },

        Commands::Token {
            api_key_uid,
            rules,
            expires_in_secs,
            secret,
        } => {
            let rules: SearchRules =
                serde_json::from_str(&rules).context("Invalid search rules JSON")?;
            let options = TenantTokenOptions {
                api_key: secret,
                expires_at: expires_in_secs
                    .map(|secs| Utc::now() + ChronoDuration::seconds(secs)),
            };
            let token = client
                .generate_tenant_token(&api_key_uid, Some(&rules), &options)
                .context("Failed to generate tenant token")?;
            println!("{token}");
        }

        Commands::Search {
            index,
            query,
            limit,
            filter,
        } => {
            let mut request = match query {
                Some(q) => SearchRequest::new(q),
                None => SearchRequest::placeholder(),
            }
            .with_limit(limit);
            if let Some(filter) = filter {
                request = request.with_filter(filter);
            }

            let results = client
                .index(index.as_str())
                .search(&request)
                .await
                .with_context(|| format!("Failed to search index {index}"))?;

            println!(
                "{} {} hits (~{}) in {} ms",
                "✓".green().bold(),
                results.hits.len(),
                results.estimated_total_hits,
                results.processing_time_ms
            );
            println!("{}", serde_json::to_string_pretty(&results.hits)?);
        }

        Commands::Keys { command } => match command {
            KeyCommands::List { limit } => {
                let keys = client
                    .get_keys(&KeysQuery {
                        limit: Some(limit),
                        offset: None,
                    })
                    .await
                    .context("Failed to list keys")?;
                let rows: Vec<KeyRow> = keys
                    .results
                    .iter()
                    .map(|key| KeyRow {
                        uid: key.uid.clone(),
                        name: key.name.clone().unwrap_or_else(|| "-".to_string()),
                        actions: key.actions.join(","),
                        indexes: key.indexes.join(","),
                        expires_at: key
                            .expires_at
                            .map(|t| t.to_rfc3339())
                            .unwrap_or_else(|| "never".to_string()),
                    })
                    .collect();
                println!("{}", Table::new(rows));
                println!("  {} {}", "Total:".bold(), keys.total);
            }
        },

        Commands::Dump { wait } => {
            let info = client.create_dump().await.context("Failed to create dump")?;
            println!(
                "{}",
                format!("✓ Dump task {} enqueued", info.task_uid).green().bold()
            );
            if wait {
                wait_task(&client, info.task_uid, None, None).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_config() -> WaitConfig {
        WaitConfig {
            interval_ms: 50,
            timeout_ms: 5000,
        }
    }

    #[test]
    fn test_wait_defaults_to_configured_timeout() {
        let (_handle, signal) = cancel_channel();

        let params = wait_params(&wait_config(), None, None, signal);

        assert_eq!(params.timeout, Some(Duration::from_millis(5000)));
        assert_eq!(params.interval, None);
        assert!(params.cancel.is_some());
    }

    #[test]
    fn test_wait_flags_override_config() {
        let (_handle, signal) = cancel_channel();

        let params = wait_params(&wait_config(), Some(200), Some(60_000), signal);

        assert_eq!(params.timeout, Some(Duration::from_millis(60_000)));
        assert_eq!(params.interval, Some(Duration::from_millis(200)));
    }
}
