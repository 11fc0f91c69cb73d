use super::coordinator::Coordinator;
use super::protocol::*;
use super::types::{RequestId, RequestStatus};
use crate::error::CrackError;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::Html;
use axum::{
    routing::{get, patch, post},
    Extension, Json, Router,
};
use std::sync::Arc;

pub async fn handle_crack_hash(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    body: Result<Json<CrackHashRequest>, JsonRejection>,
) -> Result<Json<CrackHashResponse>, CrackError> {
    let Json(req) = body?;
    match coordinator.submit(&req.hash, req.max_length, None).await {
        Ok(hash_data) => {
            tracing::info!("Crack request submitted: {}", hash_data.request_id);
            Ok(Json(CrackHashResponse {
                request_id: hash_data.request_id.0,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to process crack request: {}", e);
            Err(e)
        }
    }
}

pub async fn handle_get_status(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    query: Result<Query<StatusParams>, QueryRejection>,
) -> Result<Json<CrackStatusResponse>, CrackError> {
    let Query(params) = query?;
    let request_id = params
        .request_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CrackError::Validation("missing requestId parameter".to_string()))?;

    let (hash_data, part_count) = coordinator.get_status(&RequestId(request_id))?;

    let response = if hash_data.status == RequestStatus::Error {
        CrackStatusResponse {
            status: hash_data.status,
            data: None,
            progress: None,
        }
    } else {
        CrackStatusResponse {
            status: hash_data.status,
            progress: Some(hash_data.progress(part_count)),
            data: Some(hash_data.data),
        }
    };

    Ok(Json(response))
}

pub async fn handle_partition_report(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    body: Result<Json<PartitionReport>, JsonRejection>,
) -> Result<StatusCode, CrackError> {
    let Json(report) = body?;
    coordinator
        .report_partition_result(&RequestId(report.request_id), report.words)
        .await
        .map_err(|e| {
            tracing::error!("Failed to apply partition report: {}", e);
            e
        })?;

    Ok(StatusCode::OK)
}

pub async fn handle_ui() -> Html<&'static str> {
    Html(include_str!("ui.html"))
}

/// Routes served on the manager's main port.
pub fn router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route("/", get(handle_ui))
        .route(ENDPOINT_CRACK, post(handle_crack_hash))
        .route(ENDPOINT_STATUS, get(handle_get_status))
        .route(ENDPOINT_PARTITION_REPORT, patch(handle_partition_report))
        .layer(Extension(coordinator))
}
