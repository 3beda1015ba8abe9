//! Shared-State Primitives
//!
//! The three synchronization domains of the service, each independent:
//!
//! - **`RequestAccounting`**: identifier counter and cumulative latency,
//!   mutated under one mutex.
//! - **`TaskRegistry`**: completed results, a concurrent map with write-once
//!   entries.
//! - **`ShutdownGate`**: the admission flag, a plain atomic.

use super::protocol::StatsResponse;
use super::types::TaskId;

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct Counters {
    issued: u64,
    elapsed_micros: u64,
}

/// Identifier allocation and submission statistics.
///
/// Both counters live under the same lock: an identifier is never visible
/// without the accounting domain that its latency will later land in.
pub struct RequestAccounting {
    counters: Mutex<Counters>,
}

impl RequestAccounting {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Issues the next identifier. No two callers observe the same value.
    pub fn allocate(&self) -> TaskId {
        let mut counters = self.counters.lock();
        counters.issued += 1;
        TaskId(counters.issued.to_string())
    }

    /// Adds one submission's request-handling time to the running total.
    /// Only submissions are recorded; queries and shutdown are not.
    pub fn record_latency(&self, micros: u64) {
        self.counters.lock().elapsed_micros += micros;
    }

    /// Total identifiers issued so far.
    pub fn issued_count(&self) -> u64 {
        self.counters.lock().issued
    }

    /// Current totals. Average is integer division, 0 with no submissions.
    pub fn snapshot(&self) -> StatsResponse {
        let counters = self.counters.lock();
        let average = if counters.issued > 0 {
            counters.elapsed_micros / counters.issued
        } else {
            0
        };
        StatsResponse {
            total: counters.issued,
            average,
        }
    }
}

impl Default for RequestAccounting {
    fn default() -> Self {
        Self::new()
    }
}

/// Completed task results keyed by identifier text.
pub struct TaskRegistry {
    results: DashMap<String, String>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            results: DashMap::new(),
        }
    }

    /// Stores the result for `task_id`. Each identifier is written exactly
    /// once, by the single executor that owns it.
    pub fn complete(&self, task_id: &TaskId, digest: String) {
        let previous = self.results.insert(task_id.0.clone(), digest);
        debug_assert!(
            previous.is_none(),
            "duplicate result for task {}",
            task_id.0
        );
    }

    /// Looks up a completed result. `None` for unknown and still-pending
    /// identifiers alike.
    pub fn lookup(&self, id: &str) -> Option<String> {
        self.results.get(id).map(|entry| entry.value().clone())
    }

    /// Number of completed tasks.
    pub fn count(&self) -> u64 {
        self.results.len() as u64
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Admission-control flag. Set once, never cleared.
pub struct ShutdownGate {
    closed: AtomicBool,
}

impl ShutdownGate {
    pub fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Closes the gate. Returns true only for the call that flipped it, so
    /// the transition is logged once.
    pub fn initiate(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }
}

impl Default for ShutdownGate {
    fn default() -> Self {
        Self::new()
    }
}
