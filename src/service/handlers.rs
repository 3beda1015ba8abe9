//! HTTP Request Handlers
//!
//! Thin glue between the router and `HashService`: extract the request,
//! delegate to the core operation, map the rejection vocabulary onto status
//! codes. The shutdown handler is the one endpoint exempt from the admission
//! gate.

use super::core::HashService;
use super::protocol::{MSG_FAREWELL, MSG_SHUTDOWN, StatsResponse, SubmitForm};
use super::types::ServiceError;

use axum::Json;
use axum::extract::{Extension, Form, Path};
use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Instant;

fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::MissingPassword | ServiceError::InvalidTaskId => StatusCode::BAD_REQUEST,
    }
}

/// POST /hash: admit a value for deferred hashing, answer with the bare
/// task identifier. Handling latency (excluding the deferred delay) feeds
/// the stats endpoint; rejected submissions record nothing.
pub async fn handle_submit(
    Extension(service): Extension<Arc<HashService>>,
    Form(form): Form<SubmitForm>,
) -> (StatusCode, String) {
    let started = Instant::now();

    let password = form.password.unwrap_or_default();
    match service.submit(&password) {
        Ok(task_id) => {
            service.record_latency(started.elapsed().as_micros() as u64);
            tracing::info!("Request {} posted for deferred processing", task_id.0);
            (StatusCode::OK, task_id.0)
        }
        Err(e) => {
            tracing::debug!("Submission rejected: {}", e);
            (status_for(&e), e.to_string())
        }
    }
}

/// GET /hash/:id: answer with the raw hash payload once the task has
/// completed. Unknown and still-pending identifiers get the same rejection.
pub async fn handle_query(
    Extension(service): Extension<Arc<HashService>>,
    Path(id): Path<String>,
) -> (StatusCode, String) {
    match service.query(&id) {
        Ok(digest) => (StatusCode::OK, digest),
        Err(e) => {
            tracing::debug!("Query for task {} rejected: {}", id, e);
            (status_for(&e), e.to_string())
        }
    }
}

/// GET /stats: JSON snapshot of submission count and average latency.
pub async fn handle_stats(
    Extension(service): Extension<Arc<HashService>>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    match service.stats() {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => Err((status_for(&e), e.to_string())),
    }
}

/// GET /shutdown: close the gate, drain every outstanding task, answer with
/// the farewell, then stop the listener after the grace period. Callable even
/// while a shutdown is already in progress; the drain is re-entrant and the
/// termination trigger tolerates the race.
pub async fn handle_shutdown(
    Extension(service): Extension<Arc<HashService>>,
) -> (StatusCode, String) {
    tracing::info!("{}", MSG_SHUTDOWN);

    service.initiate_shutdown();
    service.drain().await;

    tracing::info!("Shutdown: all outstanding tasks completed");
    service.schedule_termination();

    (StatusCode::OK, MSG_FAREWELL.to_string())
}
