use super::pool::CrackerPool;
use super::protocol::*;
use crate::error::CrackError;

use axum::extract::rejection::JsonRejection;
use axum::{http::StatusCode, routing::post, Extension, Json, Router};
use std::sync::Arc;

pub async fn handle_crack_task(
    Extension(pool): Extension<Arc<CrackerPool>>,
    body: Result<Json<WorkerTask>, JsonRejection>,
) -> Result<StatusCode, CrackError> {
    let Json(task) = body.map_err(|rejection| {
        tracing::warn!("Rejected malformed task: {}", rejection.body_text());
        CrackError::from(rejection)
    })?;
    tracing::debug!(
        "Received partition {}/{} of request {}",
        task.part_number,
        task.part_count,
        task.request_id
    );

    pool.accept(task).map_err(|e| {
        tracing::error!("Failed to accept task: {}", e);
        e
    })?;

    Ok(StatusCode::OK)
}

/// Routes served on the worker's main port.
pub fn router(pool: Arc<CrackerPool>) -> Router {
    Router::new()
        .route(ENDPOINT_CRACK_TASK, post(handle_crack_task))
        .layer(Extension(pool))
}
