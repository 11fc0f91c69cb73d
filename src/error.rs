//! Error taxonomy shared by the manager and the worker.
//!
//! Validation and not-found conditions go straight back to the caller.
//! Dispatch and persistence failures abort the operation in flight.
//! Every variant maps onto one HTTP status so handlers can return
//! `Result<_, CrackError>` directly.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrackError>;

#[derive(Error, Debug)]
pub enum CrackError {
    /// Malformed submission or assignment.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown request id.
    #[error("request not found: {0}")]
    NotFound(String),

    /// Every configured worker refused one partition.
    #[error("all workers are unavailable (request {request_id}, partition {part_number})")]
    DispatchUnavailable {
        request_id: String,
        part_number: u32,
    },

    /// Ledger read or write failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Delivery to a peer failed, or the local worker queue refused the job.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CrackError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrackError::Validation(_) => StatusCode::BAD_REQUEST,
            CrackError::NotFound(_) => StatusCode::NOT_FOUND,
            CrackError::DispatchUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CrackError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CrackError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for CrackError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for CrackError {
    fn from(rejection: JsonRejection) -> Self {
        CrackError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for CrackError {
    fn from(rejection: QueryRejection) -> Self {
        CrackError::Validation(rejection.body_text())
    }
}
