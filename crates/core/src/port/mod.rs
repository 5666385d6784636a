// Port Layer - Interfaces for external dependencies

pub mod task_fetcher;
pub mod time_provider; // For deterministic testing
pub mod transport;

// Re-exports
pub use task_fetcher::TaskFetcher;
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
