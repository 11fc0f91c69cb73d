//! Partition delivery to workers.

use crate::cracker::protocol::{WorkerTask, ENDPOINT_CRACK_TASK};

use anyhow::Result;
use async_trait::async_trait;

/// Delivers one partition assignment to one worker.
///
/// An `Err` means the worker did not take the partition, whatever the reason;
/// the coordinator then tries the next worker.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send_task(&self, worker_url: &str, task: &WorkerTask) -> Result<()>;
}

/// `POST`s assignments as JSON. No timeout beyond the client default.
pub struct HttpDispatcher {
    http_client: reqwest::Client,
}

impl HttpDispatcher {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn send_task(&self, worker_url: &str, task: &WorkerTask) -> Result<()> {
        let url = format!("{}{}", worker_url.trim_end_matches('/'), ENDPOINT_CRACK_TASK);

        let response = self.http_client.post(url).json(task).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Worker {} rejected task: {}",
                worker_url,
                response.status()
            ));
        }

        tracing::debug!(
            "Task {}/{} of request {} delivered to {}",
            task.part_number,
            task.part_count,
            task.request_id,
            worker_url
        );

        Ok(())
    }
}
