// Task poller constants (ADR: No magic values)
use std::time::Duration;

/// Pause between two status fetches of the same task (50ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Deadline applied when the caller supplies neither a timeout nor a cancel signal (5s)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);
