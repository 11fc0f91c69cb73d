//! Result delivery to the manager.

use crate::coordinator::protocol::{PartitionReport, ENDPOINT_PARTITION_REPORT};

use anyhow::Result;
use async_trait::async_trait;

/// Sink for finished partitions.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn send_result(&self, request_id: &str, words: Vec<String>) -> Result<()>;
}

/// Sends partition results to the manager with a single `PATCH`.
pub struct HttpReporter {
    manager_url: String,
    http_client: reqwest::Client,
}

impl HttpReporter {
    pub fn new(manager_url: &str) -> Self {
        Self {
            manager_url: manager_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Reporter for HttpReporter {
    async fn send_result(&self, request_id: &str, words: Vec<String>) -> Result<()> {
        let payload = PartitionReport {
            request_id: request_id.to_string(),
            words,
        };

        let response = self
            .http_client
            .patch(format!("{}{}", self.manager_url, ENDPOINT_PARTITION_REPORT))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Manager rejected report: {}",
                response.status()
            ));
        }

        tracing::debug!("Reported partition result of request {} to manager", request_id);

        Ok(())
    }
}
