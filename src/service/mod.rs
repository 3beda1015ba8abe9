//! Asynchronous Task Service Module
//!
//! This module implements the deferred task-processing engine behind the HTTP
//! API: a submission is admitted, assigned an identifier, and answered
//! immediately; the actual transformation runs after a fixed delay on a
//! detached task, and the client polls for the result.
//!
//! ## Architecture Overview
//! 1. **Admission**: every request-accepting operation first consults the
//!    shutdown gate. Once the gate closes, submissions and queries are
//!    rejected and no state is mutated.
//! 2. **Allocation**: accepted submissions receive a strictly increasing
//!    identifier from the request-accounting domain, which also aggregates
//!    per-submission handling latency for the stats endpoint.
//! 3. **Deferred execution**: each accepted identifier gets exactly one
//!    detached executor that sleeps, transforms, and publishes its result.
//!    Executors are never cancelled, not even during shutdown.
//! 4. **Drain and terminate**: shutdown closes the gate, waits until the
//!    completed-task count matches the issued-identifier count, answers with
//!    a farewell, and then stops the listener after a short grace period.
//!
//! ## Submodules
//! - **`state`**: Shared-state primitives (accounting, result registry, gate).
//! - **`executor`**: The deferred execution path for accepted submissions.
//! - **`core`**: The `HashService` aggregate and shutdown coordination.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`protocol`**: Endpoint constants, messages, and API DTOs.
//! - **`types`**: Task identifier and the rejection vocabulary.

pub mod core;
pub mod executor;
pub mod handlers;
pub mod protocol;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
