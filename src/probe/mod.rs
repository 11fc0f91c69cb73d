//! Liveness probe, served on its own port by both roles.

use axum::{http::StatusCode, routing::get, Router};

pub const ENDPOINT_HEALTH: &str = "/healthz";

pub async fn handle_health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "success")
}

pub fn router() -> Router {
    Router::new().route(ENDPOINT_HEALTH, get(handle_health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_success() {
        let (status, body) = handle_health().await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "success");
    }
}
