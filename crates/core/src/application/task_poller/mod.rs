//! Task Poller - waits for a server-side task to reach a terminal status
//!
//! Mutating calls return as soon as the server has enqueued the work. The
//! poller turns that into a cancellable wait:
//! - fetch the task; a terminal status (`succeeded`, `failed`, `canceled`)
//!   is returned as-is, the caller inspects it
//! - otherwise pause for exactly one interval and fetch again
//! - a cancel signal or elapsed deadline ends the wait with an error that
//!   carries the task uid and the last status seen
//! - a failed fetch is returned immediately and never retried

mod cancel;
pub mod constants;

pub use cancel::{cancel_channel, CancelHandle, CancelSignal};
use constants::*;

use crate::domain::{Task, TaskStatus, TaskUid};
use crate::error::{AppError, Result};
use crate::port::TaskFetcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

/// Per-call wait parameters
#[derive(Debug, Clone, Default)]
pub struct WaitParams {
    /// Pause between fetches (default: 50ms)
    pub interval: Option<Duration>,
    /// Deadline measured from the start of the wait
    pub timeout: Option<Duration>,
    /// External cancellation; without a timeout it replaces the default deadline
    pub cancel: Option<CancelSignal>,
}

impl WaitParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Polls one task at a time; holds no per-wait state, so one poller can serve
/// any number of concurrent waits.
pub struct TaskPoller {
    fetcher: Arc<dyn TaskFetcher>,
    default_interval: Duration,
    default_timeout: Duration,
}

impl TaskPoller {
    pub fn new(fetcher: Arc<dyn TaskFetcher>) -> Self {
        Self::with_defaults(fetcher, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT)
    }

    /// Create a poller with configured fallbacks for unset `WaitParams`
    pub fn with_defaults(
        fetcher: Arc<dyn TaskFetcher>,
        default_interval: Duration,
        default_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            default_interval,
            default_timeout,
        }
    }

    /// Wait until task `uid` is terminal
    ///
    /// Returns the terminal task even when its status is `failed` or
    /// `canceled`; only the wait itself failing produces an error.
    ///
    /// # Errors
    /// - `AppError::WaitTimeout` if the deadline elapses first
    /// - `AppError::WaitCancelled` if the cancel signal fires first
    /// - the fetcher's error, unchanged, if a status fetch fails
    pub async fn wait_for_task(&self, uid: TaskUid, params: WaitParams) -> Result<Task> {
        let interval = params.interval.unwrap_or(self.default_interval);
        let timeout = match (params.timeout, &params.cancel) {
            (Some(timeout), _) => Some(timeout),
            (None, None) => Some(self.default_timeout),
            (None, Some(_)) => None,
        };
        // A timeout too large to represent is no deadline at all
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut cancel = params.cancel;
        let mut last_status: Option<TaskStatus> = None;
        let mut polls: u32 = 0;

        debug!(task_uid = uid, ?interval, ?timeout, "Waiting for task");

        loop {
            let fetch = self.fetcher.fetch_task(uid);

            // The first fetch is never cut short by the deadline.
            let task = if polls == 0 {
                tokio::select! {
                    biased;
                    result = fetch => result?,
                    _ = cancel_fired(&mut cancel) => return Err(Self::cancelled(uid, last_status, polls)),
                }
            } else {
                tokio::select! {
                    biased;
                    result = fetch => result?,
                    _ = cancel_fired(&mut cancel) => return Err(Self::cancelled(uid, last_status, polls)),
                    _ = deadline_elapsed(deadline) => return Err(Self::timed_out(uid, last_status, polls)),
                }
            };
            polls += 1;

            if task.status.is_terminal() {
                info!(task_uid = uid, status = %task.status, polls, "Task reached terminal status");
                return Ok(task);
            }

            debug!(task_uid = uid, status = %task.status, polls, "Task not finished yet");
            last_status = Some(task.status);

            if cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
                return Err(Self::cancelled(uid, last_status, polls));
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(Self::timed_out(uid, last_status, polls));
            }

            tokio::select! {
                biased;
                _ = cancel_fired(&mut cancel) => return Err(Self::cancelled(uid, last_status, polls)),
                _ = deadline_elapsed(deadline) => return Err(Self::timed_out(uid, last_status, polls)),
                _ = sleep(interval) => {}
            }
        }
    }

    fn timed_out(uid: TaskUid, last_status: Option<TaskStatus>, polls: u32) -> AppError {
        warn!(task_uid = uid, ?last_status, polls, "Timed out waiting for task");
        AppError::WaitTimeout {
            task_uid: uid,
            last_status,
        }
    }

    fn cancelled(uid: TaskUid, last_status: Option<TaskStatus>, polls: u32) -> AppError {
        warn!(task_uid = uid, ?last_status, polls, "Wait for task cancelled");
        AppError::WaitCancelled {
            task_uid: uid,
            last_status,
        }
    }
}

async fn cancel_fired(signal: &mut Option<CancelSignal>) {
    match signal {
        Some(signal) => signal.cancelled().await,
        None => std::future::pending().await,
    }
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
