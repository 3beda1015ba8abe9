//! Deferred Execution Path
//!
//! Every admitted submission spawns exactly one detached task that sleeps for
//! the configured delay, computes the transformation, and publishes the
//! result. The submitting request never waits on it.
//!
//! Executors are never cancelled, shutdown included: the drain protocol
//! counts on every issued identifier eventually producing its registry entry.

use super::state::TaskRegistry;
use super::types::TaskId;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Type alias for the transformation applied to each submitted value.
/// Injected as a closure so the engine stays transformation-agnostic.
pub type TransformFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Spawns and runs the deferred half of each submission.
pub struct TaskExecutor {
    /// Destination for completed results.
    registry: Arc<TaskRegistry>,
    /// Woken after every registry write; the drain loop waits on this.
    completions: Arc<Notify>,
    transform: TransformFn,
    delay: Duration,
}

impl TaskExecutor {
    pub fn new(
        registry: Arc<TaskRegistry>,
        completions: Arc<Notify>,
        transform: TransformFn,
        delay: Duration,
    ) -> Self {
        Self {
            registry,
            completions,
            transform,
            delay,
        }
    }

    /// Launches the deferred computation for `task_id` and returns
    /// immediately. The spawned task runs to completion unconditionally.
    pub fn spawn_deferred(&self, task_id: TaskId, input: String) {
        let registry = self.registry.clone();
        let completions = self.completions.clone();
        let transform = self.transform.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            // Pause before processing
            tokio::time::sleep(delay).await;

            let digest = transform(&input);
            registry.complete(&task_id, digest);

            // Wake any drain loop watching the completion count
            completions.notify_waiters();

            tracing::info!("Deferred processing completed for task {}", task_id.0);
        });
    }
}
