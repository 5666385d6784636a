// Application Layer - Use Cases on top of the ports

pub mod api;
pub mod task_poller;
pub mod tasks;
pub mod tenant_token;

// Re-exports
pub use task_poller::{cancel_channel, CancelHandle, CancelSignal, TaskPoller, WaitParams};
pub use tasks::TaskApi;
pub use tenant_token::{
    decode_tenant_token, TenantTokenClaims, TenantTokenGenerator, TenantTokenOptions,
};
