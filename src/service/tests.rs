//! Service Module Tests
//!
//! Unit and scenario tests for the task lifecycle and shutdown coordination.
//!
//! ## Test Scopes
//! - **State primitives**: identifier allocation, the write-once registry,
//!   and the admission gate.
//! - **Lifecycle**: deferred completion timing, observed through a paused
//!   tokio clock so the fixed delay is deterministic.
//! - **Shutdown**: gate rejections, the drain condition, and the
//!   termination trigger.

#[cfg(test)]
mod tests {
    use crate::service::core::HashService;
    use crate::service::executor::TransformFn;
    use crate::service::protocol::StatsResponse;
    use crate::service::state::{RequestAccounting, ShutdownGate, TaskRegistry};
    use crate::service::types::{ServiceError, TaskId};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Service with a trivial injected transform, so assertions can predict
    /// results without hashing.
    fn test_service(delay: Duration) -> (Arc<HashService>, oneshot::Receiver<()>) {
        let transform: TransformFn = Arc::new(|input: &str| format!("hashed:{}", input));
        HashService::new(transform, delay)
    }

    // ============================================================
    // State primitives
    // ============================================================

    #[test]
    fn test_allocation_is_monotonic() {
        let accounting = RequestAccounting::new();

        assert_eq!(accounting.allocate(), TaskId("1".to_string()));
        assert_eq!(accounting.allocate(), TaskId("2".to_string()));
        assert_eq!(accounting.allocate(), TaskId("3".to_string()));
        assert_eq!(accounting.issued_count(), 3);
    }

    #[test]
    fn test_registry_stores_and_counts() {
        let registry = TaskRegistry::new();
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.lookup("1"), None);

        registry.complete(&TaskId("1".to_string()), "digest-one".to_string());

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.lookup("1"), Some("digest-one".to_string()));
        assert_eq!(registry.lookup("2"), None);
    }

    #[test]
    fn test_gate_flips_once() {
        let gate = ShutdownGate::new();
        assert!(!gate.is_shutting_down());

        // Only the first caller observes the transition
        assert!(gate.initiate());
        assert!(!gate.initiate());
        assert!(gate.is_shutting_down());
    }

    // ============================================================
    // Submission and identifier allocation
    // ============================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_get_distinct_contiguous_ids() {
        let (service, _terminate_rx) = test_service(Duration::from_millis(1));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.submit("value").unwrap().0
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        // 32 accepted submissions, 32 distinct ids covering 1..=32
        assert_eq!(ids.len(), 32);
        for n in 1..=32u64 {
            assert!(ids.contains(&n.to_string()), "missing id {}", n);
        }
        assert_eq!(service.issued_count(), 32);
    }

    #[tokio::test]
    async fn test_empty_submission_allocates_nothing() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        assert_eq!(service.submit(""), Err(ServiceError::MissingPassword));
        assert_eq!(service.issued_count(), 0);
        assert_eq!(service.completed_count(), 0);
    }

    // ============================================================
    // Deferred completion
    // ============================================================

    #[tokio::test(start_paused = true)]
    async fn test_submitted_value_completes_after_delay() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        let task_id = service.submit("abc123").unwrap();
        assert_eq!(task_id.0, "1");

        // Still inside the delay window
        assert_eq!(service.query("1"), Err(ServiceError::InvalidTaskId));

        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(service.query("1").unwrap(), "hashed:abc123");
        // Repeated reads are stable
        assert_eq!(service.query("1").unwrap(), "hashed:abc123");
        assert_eq!(service.completed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_is_rejected() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        assert_eq!(service.query("42"), Err(ServiceError::InvalidTaskId));
    }

    // ============================================================
    // Statistics
    // ============================================================

    #[tokio::test]
    async fn test_stats_start_at_zero() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        assert_eq!(
            service.stats().unwrap(),
            StatsResponse {
                total: 0,
                average: 0
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_average_uses_integer_division() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        service.submit("first").unwrap();
        service.record_latency(101);
        service.submit("second").unwrap();
        service.record_latency(100);

        assert_eq!(
            service.stats().unwrap(),
            StatsResponse {
                total: 2,
                average: 100
            }
        );
    }

    #[test]
    fn test_stats_wire_format() {
        let snapshot = StatsResponse {
            total: 7,
            average: 123,
        };

        let json = serde_json::to_string(&snapshot).expect("serialization failed");
        assert_eq!(json, r#"{"total":7,"average":123}"#);

        let restored: StatsResponse = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(restored, snapshot);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queries_do_not_contribute_latency() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        service.submit("first").unwrap();
        service.record_latency(250);

        let before = service.stats().unwrap();
        let _ = service.query("1");
        let _ = service.query("missing");
        assert_eq!(service.stats().unwrap(), before);
    }

    // ============================================================
    // Shutdown gate
    // ============================================================

    #[tokio::test(start_paused = true)]
    async fn test_gate_rejects_all_request_operations() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        let task_id = service.submit("abc123").unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(service.completed_count(), 1);

        service.initiate_shutdown();
        // Idempotent, still closed
        service.initiate_shutdown();
        assert!(service.is_shutting_down());

        assert_eq!(service.submit("late"), Err(ServiceError::ShuttingDown));
        assert_eq!(service.query(&task_id.0), Err(ServiceError::ShuttingDown));
        assert_eq!(service.stats(), Err(ServiceError::ShuttingDown));

        // Nothing was allocated or mutated by the rejected calls
        assert_eq!(service.issued_count(), 1);
        assert_eq!(service.completed_count(), 1);
    }

    // ============================================================
    // Drain protocol
    // ============================================================

    #[tokio::test(start_paused = true)]
    async fn test_drain_waits_for_pending_task() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        service.submit("abc123").unwrap();
        service.initiate_shutdown();

        // A submission attempted during the drain window is turned away
        assert_eq!(service.submit("other"), Err(ServiceError::ShuttingDown));

        let drained = Arc::new(AtomicBool::new(false));
        let watcher = {
            let service = service.clone();
            let drained = drained.clone();
            tokio::spawn(async move {
                service.drain().await;
                drained.store(true, Ordering::SeqCst);
            })
        };

        // The executor is still inside its delay window, so the drain
        // cannot have completed yet
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert!(!drained.load(Ordering::SeqCst));
        assert_eq!(service.completed_count(), 0);

        watcher.await.unwrap();
        assert!(drained.load(Ordering::SeqCst));
        assert_eq!(service.completed_count(), service.issued_count());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_with_no_outstanding_work_returns_immediately() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        service.initiate_shutdown();

        tokio::time::timeout(Duration::from_secs(1), service.drain())
            .await
            .expect("drain should not block with nothing outstanding");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_is_reentrant() {
        let (service, _terminate_rx) = test_service(Duration::from_secs(5));

        service.submit("abc123").unwrap();
        service.initiate_shutdown();
        service.drain().await;

        // A second drain observes the already-satisfied condition
        tokio::time::timeout(Duration::from_secs(1), service.drain())
            .await
            .expect("second drain should return immediately");
        assert_eq!(service.completed_count(), 1);
    }

    // ============================================================
    // Termination trigger
    // ============================================================

    #[tokio::test]
    async fn test_terminate_fires_receiver_once() {
        let (service, terminate_rx) = test_service(Duration::from_secs(5));

        service.terminate();
        terminate_rx.await.expect("termination signal should arrive");

        // The race with an already-consumed channel is tolerated
        service.terminate();
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_termination_arrives_after_grace_period() {
        let (service, terminate_rx) = test_service(Duration::from_secs(5));

        service.schedule_termination();
        terminate_rx
            .await
            .expect("termination signal should arrive after the grace period");
    }
}
