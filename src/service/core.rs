//! Service Aggregate and Shutdown Coordination
//!
//! `HashService` owns the shared-state primitives and exposes the boundary
//! operations the routing layer maps onto endpoints: submit, query, stats,
//! and the shutdown sequence (gate, drain, terminate).

use super::executor::{TaskExecutor, TransformFn};
use super::protocol::StatsResponse;
use super::state::{RequestAccounting, ShutdownGate, TaskRegistry};
use super::types::{ServiceError, TaskId};

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, oneshot};

/// Delay between accepting a submission and computing its result.
pub const DELAY_TIME: Duration = Duration::from_secs(5);

/// Pause between the farewell response and listener termination, so the
/// response can flush to the caller.
const GRACE_PERIOD: Duration = Duration::from_secs(1);

pub struct HashService {
    gate: ShutdownGate,
    accounting: RequestAccounting,
    registry: Arc<TaskRegistry>,
    completions: Arc<Notify>,
    executor: TaskExecutor,
    /// Consumed by the first successful `terminate` call.
    terminate_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl HashService {
    /// Builds the service around an injected transform and delay. The
    /// returned receiver resolves once `terminate` fires and is meant to
    /// drive the HTTP server's graceful shutdown.
    pub fn new(transform: TransformFn, delay: Duration) -> (Arc<Self>, oneshot::Receiver<()>) {
        let registry = Arc::new(TaskRegistry::new());
        let completions = Arc::new(Notify::new());
        let (terminate_tx, terminate_rx) = oneshot::channel();

        let executor = TaskExecutor::new(registry.clone(), completions.clone(), transform, delay);

        let service = Arc::new(Self {
            gate: ShutdownGate::new(),
            accounting: RequestAccounting::new(),
            registry,
            completions,
            executor,
            terminate_tx: Mutex::new(Some(terminate_tx)),
        });

        (service, terminate_rx)
    }

    /// Admits a submission: allocates an identifier and launches its deferred
    /// executor. The caller gets the identifier without waiting for the
    /// result. Rejected submissions allocate nothing.
    pub fn submit(&self, input: &str) -> Result<TaskId, ServiceError> {
        if self.gate.is_shutting_down() {
            return Err(ServiceError::ShuttingDown);
        }
        if input.is_empty() {
            return Err(ServiceError::MissingPassword);
        }

        let task_id = self.accounting.allocate();
        self.executor
            .spawn_deferred(task_id.clone(), input.to_string());

        Ok(task_id)
    }

    /// Returns the completed result for `id`. Identifiers that were never
    /// issued and tasks still inside their delay window are rejected alike.
    pub fn query(&self, id: &str) -> Result<String, ServiceError> {
        if self.gate.is_shutting_down() {
            return Err(ServiceError::ShuttingDown);
        }
        self.registry.lookup(id).ok_or(ServiceError::InvalidTaskId)
    }

    /// Current submission statistics.
    pub fn stats(&self) -> Result<StatsResponse, ServiceError> {
        if self.gate.is_shutting_down() {
            return Err(ServiceError::ShuttingDown);
        }
        Ok(self.accounting.snapshot())
    }

    /// Adds one submission's handling time to the statistics.
    pub fn record_latency(&self, micros: u64) {
        self.accounting.record_latency(micros);
    }

    /// Closes the admission gate. Idempotent.
    pub fn initiate_shutdown(&self) {
        if self.gate.initiate() {
            tracing::info!("Admission gate closed, draining outstanding tasks");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.gate.is_shutting_down()
    }

    /// Waits until every issued identifier has a registry entry.
    ///
    /// Correct only once the gate is closed: no identifier is issued past
    /// that point, and each issued one produces exactly one entry. The waiter
    /// is registered before the counts are compared, so a completion landing
    /// between the check and the await still wakes the loop. Re-entrant: a
    /// second drain observes the same condition and returns.
    pub async fn drain(&self) {
        loop {
            let completed = self.completions.notified();
            if self.registry.count() >= self.accounting.issued_count() {
                return;
            }
            completed.await;
        }
    }

    /// Fires listener termination after the grace period, detached from the
    /// calling request.
    pub fn schedule_termination(self: Arc<Self>) {
        tokio::spawn(async move {
            tokio::time::sleep(GRACE_PERIOD).await;
            self.terminate();
        });
    }

    /// Stops the HTTP listener by firing the termination channel. A second
    /// call finds the channel already consumed; that race is expected and
    /// only logged.
    pub fn terminate(&self) {
        match self.terminate_tx.lock().take() {
            Some(sender) => {
                if sender.send(()).is_err() {
                    tracing::warn!("Listener was already gone at termination");
                }
            }
            None => {
                tracing::debug!("Termination already triggered, nothing to do");
            }
        }
    }

    /// Completed-task count, compared against `issued_count` by the drain
    /// condition.
    pub fn completed_count(&self) -> u64 {
        self.registry.count()
    }

    /// Identifiers issued so far.
    pub fn issued_count(&self) -> u64 {
        self.accounting.issued_count()
    }
}
