use thiserror::Error;

/// Unique identifier for a submitted task.
///
/// Wrapper around the decimal text of the allocation counter. Identifiers
/// are strictly increasing and never reused for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(pub String);

/// Rejection vocabulary for the request-accepting operations.
///
/// Every variant maps to a terse user-visible message; the HTTP layer decides
/// the status code. None of these abort the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The shutdown gate is closed; no new work is admitted.
    #[error("Service is shutting down, request rejected")]
    ShuttingDown,
    /// Submission arrived with an empty or missing password field. No
    /// identifier is allocated for it.
    #[error("Error: Missing or invalid password")]
    MissingPassword,
    /// Query for an identifier with no completed result. Covers both ids
    /// that were never issued and tasks still inside their delay window.
    #[error("Error: Invalid task Id")]
    InvalidTaskId,
}
