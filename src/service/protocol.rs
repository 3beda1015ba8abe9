//! HTTP Protocol Definitions
//!
//! Endpoint paths, user-visible messages, and the Data Transfer Objects used
//! by the public API. The router in `main.rs` and the handlers both draw
//! their vocabulary from here.

use serde::{Deserialize, Serialize};

pub const ENDPOINT_HASH: &str = "/hash";
pub const ENDPOINT_STATS: &str = "/stats";
pub const ENDPOINT_SHUTDOWN: &str = "/shutdown";

pub const MSG_SHUTDOWN: &str = "Initiating service shutdown";
pub const MSG_FAREWELL: &str = "All requests have been processed, terminating service.";

/// Form body of a submission.
///
/// The field is optional so that a missing `password` key and an empty value
/// are both reachable and rejected the same way.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub password: Option<String>,
}

/// Submission statistics snapshot.
///
/// `average` is the integer mean of per-submission handling latency in
/// microseconds; 0 when nothing has been submitted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub total: u64,
    pub average: u64,
}
