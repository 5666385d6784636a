// Transport implementation over reqwest
// reason: reqwest for pooled async HTTP with per-request timeouts (ADR-002)
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use meili_core::port::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Header identifying the client library (and any wrapping integrations)
pub const CLIENT_AGENT_HEADER: &str = "X-Meilisearch-Client";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings of the transport
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Base URL, e.g. `http://localhost:7700`
    pub host: String,
    /// Sent as `Authorization: Bearer <api_key>`; may be a tenant token
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Extra agents appended to the client agent header
    pub client_agents: Vec<String>,
}

impl HttpSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            client_agents: Vec::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_client_agents(mut self, agents: Vec<String>) -> Self {
        self.client_agents = agents;
        self
    }
}

/// `Transport` backed by a pooled `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    client_agent: String,
}

impl ReqwestTransport {
    /// Build a transport from settings
    ///
    /// # Errors
    /// `TransportError::InvalidRequest` if the host is empty or the HTTP client
    /// cannot be constructed
    pub fn new(settings: HttpSettings) -> Result<Self, TransportError> {
        let base_url = settings.host.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TransportError::InvalidRequest(
                "host must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.filter(|k| !k.is_empty()),
            client_agent: client_agent(&settings.client_agents),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn client_agent(extra: &[String]) -> String {
    let mut agents = vec![format!("Meili Rust (v{})", meili_core::VERSION)];
    agents.extend(extra.iter().filter(|a| !a.is_empty()).cloned());
    agents.join(" ; ")
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn to_transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Communication(err.to_string())
    }
}

/// Parse a response body
///
/// Empty bodies (204, empty 202) yield `None`. Non-JSON bodies of error
/// responses are kept as a JSON string so the caller can report them.
fn parse_body(status: StatusCode, bytes: &[u8]) -> Result<Option<Value>, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(Some(value)),
        Err(_) if !status.is_success() => Ok(Some(Value::String(
            String::from_utf8_lossy(bytes).into_owned(),
        ))),
        Err(e) => Err(TransportError::InvalidResponse(e.to_string())),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn issue(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .client
            .request(to_method(request.method), &url)
            .header(CLIENT_AGENT_HEADER, &self.client_agent);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = %request.method, url = %url, error = %e, "HTTP request failed");
            to_transport_error(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(to_transport_error)?;
        debug!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            "HTTP response received"
        );

        Ok(HttpResponse::new(status.as_u16(), parse_body(status, &bytes)?))
    }
}
