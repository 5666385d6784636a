// Meili Infrastructure - HTTP Adapter
// Implements: Transport (ADR-002)

pub mod reqwest_transport;

pub use reqwest_transport::{HttpSettings, ReqwestTransport, CLIENT_AGENT_HEADER};
