// Task Fetcher Port
// The only collaborator the task poller needs: a read of one task by uid

use crate::domain::{Task, TaskUid};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to server-side task state
///
/// Fetches must be idempotent: the poller calls this repeatedly for the same
/// uid, possibly from several call sites at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskFetcher: Send + Sync {
    async fn fetch_task(&self, uid: TaskUid) -> Result<Task>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{TaskStatus, TaskType};
    use crate::error::AppError;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::{Duration, Instant};

    /// Build a bare task in the given status
    pub fn task_with_status(uid: TaskUid, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            uid,
            index_uid: Some("movies".to_string()),
            status,
            task_type: TaskType::DocumentAdditionOrUpdate,
            details: None,
            error: None,
            duration: None,
            enqueued_at: now,
            started_at: (status != TaskStatus::Enqueued).then_some(now),
            finished_at: status.is_terminal().then_some(now),
        }
    }

    /// Returns a fixed sequence of statuses, one per fetch
    ///
    /// The last entry repeats once the sequence is exhausted.
    pub struct SequenceTaskFetcher {
        statuses: Vec<TaskStatus>,
        calls: AtomicUsize,
    }

    impl SequenceTaskFetcher {
        pub fn new(statuses: Vec<TaskStatus>) -> Self {
            Self {
                statuses,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskFetcher for SequenceTaskFetcher {
        async fn fetch_task(&self, uid: TaskUid) -> Result<Task> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let status = self
                .statuses
                .get(n)
                .or_else(|| self.statuses.last())
                .copied()
                .ok_or_else(|| AppError::Validation("empty status sequence".to_string()))?;
            Ok(task_with_status(uid, status))
        }
    }

    /// Status changes at fixed offsets from construction time
    ///
    /// Uses tokio's clock, so it follows paused time in tests.
    pub struct TimelineTaskFetcher {
        started: Instant,
        transitions: Vec<(Duration, TaskStatus)>,
        fetch_times: Mutex<Vec<Duration>>,
    }

    impl TimelineTaskFetcher {
        /// `transitions` must be sorted by offset; status before the first
        /// transition is `Enqueued`.
        pub fn new(transitions: Vec<(Duration, TaskStatus)>) -> Self {
            Self {
                started: Instant::now(),
                transitions,
                fetch_times: Mutex::new(Vec::new()),
            }
        }

        /// Elapsed time at each fetch
        pub fn fetch_times(&self) -> Vec<Duration> {
            self.fetch_times.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskFetcher for TimelineTaskFetcher {
        async fn fetch_task(&self, uid: TaskUid) -> Result<Task> {
            let elapsed = self.started.elapsed();
            self.fetch_times.lock().unwrap().push(elapsed);
            let status = self
                .transitions
                .iter()
                .take_while(|(at, _)| *at <= elapsed)
                .last()
                .map(|(_, status)| *status)
                .unwrap_or(TaskStatus::Enqueued);
            Ok(task_with_status(uid, status))
        }
    }

    /// Answers the first fetch immediately, then every later fetch only
    /// after `stall` has passed
    pub struct StallingTaskFetcher {
        status: TaskStatus,
        stall: Duration,
        calls: AtomicUsize,
    }

    impl StallingTaskFetcher {
        pub fn new(status: TaskStatus, stall: Duration) -> Self {
            Self {
                status,
                stall,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskFetcher for StallingTaskFetcher {
        async fn fetch_task(&self, uid: TaskUid) -> Result<Task> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                tokio::time::sleep(self.stall).await;
            }
            Ok(task_with_status(uid, self.status))
        }
    }
}
