//! Client Configuration
//!
//! Layered like this, lowest precedence first:
//! 1. built-in defaults
//! 2. optional TOML file (`<config dir>/meili/config.toml` by default)
//! 3. `MEILI_*` environment variables, `__` separating nested keys
//!    (`MEILI_HOST`, `MEILI_API_KEY`, `MEILI_WAIT__TIMEOUT_MS`)

use crate::error::{Result, SdkError};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use meili_infra_http::HttpSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MEILI";

const DEFAULT_HOST: &str = "http://localhost:7700";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_WAIT_INTERVAL_MS: u64 = 50;
const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Immutable client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    /// Master key, API key, or tenant token
    pub api_key: Option<String>,
    /// Per-request HTTP timeout
    pub timeout_ms: u64,
    /// Extra client agents reported to the server
    pub client_agents: Vec<String>,
    pub wait: WaitConfig,
}

/// Fallbacks for `wait_for_task` calls that leave a parameter unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: None,
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            client_agents: Vec::new(),
            wait: WaitConfig::default(),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_WAIT_INTERVAL_MS,
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_client_agent(mut self, agent: impl Into<String>) -> Self {
        self.client_agents.push(agent.into());
        self
    }

    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Default config file location (`config.toml` in the platform config dir)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "meili").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default file (if present) and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Load from `path` (if given and present) and the process environment
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        Self::build(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let env = env
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("client_agents");

        let config: ClientConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no client can work with
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SdkError::Config("host must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(SdkError::Config("timeout_ms must be positive".to_string()));
        }
        if self.wait.interval_ms == 0 {
            return Err(SdkError::Config(
                "wait.interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait.interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait.timeout_ms)
    }

    /// Transport settings derived from this config
    pub fn http_settings(&self) -> HttpSettings {
        let settings = HttpSettings::new(self.host.clone())
            .with_timeout(self.request_timeout())
            .with_client_agents(self.client_agents.clone());
        match &self.api_key {
            Some(key) => settings.with_api_key(key.clone()),
            None => settings,
        }
    }
}
