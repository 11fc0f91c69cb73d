//! Request Coordinator
//!
//! Owns the table of crack requests and every transition they go through.
//!
//! ## Concurrency
//! The table is a `DashMap`, so a mutation locks only the shard holding that request.
//! All mutations of one request are serialized by that shard lock, which is the only
//! ordering the lifecycle relies on. Entries are never evicted; the table grows for
//! the lifetime of the process.
//!
//! Dispatch fans out one task per partition and collects their outcomes through a
//! channel sized to the partition count. Watchdogs are detached timers that cannot
//! be cancelled; a watchdog firing after the request moved on is a no-op.

use super::dispatch::Dispatcher;
use super::ledger::Ledger;
use super::types::*;
use crate::cracker::protocol::WorkerTask;
use crate::error::{CrackError, Result};
use crate::keyspace::Keyspace;

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Static settings, fixed for the lifetime of the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// One URL per worker. Its length is the partition count of every request.
    pub worker_urls: Vec<String>,
    pub alphabet: String,
    /// Delay after dispatch before an unanswered request is marked `ERROR`.
    pub ttl: Duration,
}

pub struct Coordinator {
    requests: DashMap<RequestId, HashData>,
    worker_urls: Arc<Vec<String>>,
    alphabet: String,
    ttl: Duration,
    ledger: Arc<dyn Ledger>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl Coordinator {
    pub fn new(
        config: CoordinatorConfig,
        ledger: Arc<dyn Ledger>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<Arc<Self>> {
        if config.worker_urls.is_empty() {
            return Err(CrackError::Validation(
                "at least one worker is required".to_string(),
            ));
        }
        if u32::try_from(config.worker_urls.len()).is_err() {
            return Err(CrackError::Validation("too many workers".to_string()));
        }
        if config.alphabet.is_empty() {
            return Err(CrackError::Validation("alphabet cannot be empty".to_string()));
        }

        Ok(Arc::new(Self {
            requests: DashMap::new(),
            worker_urls: Arc::new(config.worker_urls),
            alphabet: config.alphabet,
            ttl: config.ttl,
            ledger,
            dispatcher,
        }))
    }

    /// Number of partitions every request is split into.
    pub fn part_count(&self) -> u32 {
        self.worker_urls.len() as u32
    }

    /// Records, persists and dispatches a crack request.
    ///
    /// Pass `request_id` only when replaying a ledger entry; otherwise a fresh id
    /// is generated. Returns as soon as every partition has been delivered (or has
    /// run out of workers), without waiting for any result.
    ///
    /// A dispatch failure is reported after all partitions resolved. Partitions that
    /// did reach a worker are left running.
    pub async fn submit(
        self: &Arc<Self>,
        hash: &str,
        max_length: u32,
        request_id: Option<RequestId>,
    ) -> Result<HashData> {
        if hash.is_empty() {
            return Err(CrackError::Validation("hash cannot be empty".to_string()));
        }
        if max_length == 0 {
            return Err(CrackError::Validation(
                "maxLength must be greater than zero".to_string(),
            ));
        }
        let keyspace = Keyspace::new(&self.alphabet, max_length).ok_or_else(|| {
            CrackError::Validation(format!(
                "search space {}^{} is too large",
                self.alphabet.chars().count(),
                max_length
            ))
        })?;

        let request_id = request_id.unwrap_or_default();
        let hash_data = HashData::new(request_id.clone());
        self.requests.insert(request_id.clone(), hash_data.clone());

        let persisted = PersistedRequest {
            request_id: request_id.clone(),
            hash: hash.to_string(),
            max_length,
        };
        if let Err(e) = self.ledger.save(&persisted).await {
            tracing::error!("Failed to persist request {}: {}", request_id, e);
            return Err(CrackError::Persistence(e.to_string()));
        }

        let tasks = self.split_task(&request_id, hash, &keyspace);
        self.dispatch_all(&request_id, tasks).await?;

        self.spawn_watchdog(request_id.clone());

        tracing::info!(
            "Request {} dispatched in {} partitions ({} candidates)",
            request_id,
            self.part_count(),
            keyspace.total()
        );

        Ok(hash_data)
    }

    /// Snapshot of a request together with the partition count.
    pub fn get_status(&self, request_id: &RequestId) -> Result<(HashData, u32)> {
        self.requests
            .get(request_id)
            .map(|entry| (entry.value().clone(), self.part_count()))
            .ok_or_else(|| CrackError::NotFound(request_id.0.clone()))
    }

    /// Folds one worker report into its request.
    ///
    /// Reports are not deduplicated: a repeated report is counted again and its
    /// words appended again. Only a counter exactly equal to the partition count
    /// means `READY`; an overshoot falls back to `PARTIAL_READY`.
    pub async fn report_partition_result(
        &self,
        request_id: &RequestId,
        words: Vec<String>,
    ) -> Result<()> {
        let part_count = self.part_count();

        let completed_now = {
            let mut entry = self
                .requests
                .get_mut(request_id)
                .ok_or_else(|| CrackError::NotFound(request_id.0.clone()))?;

            entry.data.extend(words);
            entry.completed_partitions += 1;

            if entry.completed_partitions == part_count {
                entry.status = RequestStatus::Ready;
            } else {
                entry.status = RequestStatus::PartialReady;
            }

            tracing::info!(
                "Request {} received partition report {}/{}",
                request_id,
                entry.completed_partitions,
                part_count
            );

            entry.completed_partitions == part_count
        };

        if completed_now {
            tracing::info!("Request {} is ready", request_id);
            if let Err(e) = self.ledger.remove(request_id).await {
                tracing::error!(
                    "Failed to remove request {} from ledger: {}",
                    request_id,
                    e
                );
            }
        }

        Ok(())
    }

    /// Resubmits every ledger entry under its original id.
    ///
    /// Progress from before the restart is not resumed; each recovered request
    /// starts over with all partitions. Returns how many entries were resubmitted
    /// successfully.
    pub async fn recover(self: &Arc<Self>) -> Result<usize> {
        let pending = self.ledger.get_all().await.map_err(|e| {
            tracing::error!("Failed to read ledger: {}", e);
            CrackError::Persistence(e.to_string())
        })?;

        tracing::info!("Recovering {} unfinished requests", pending.len());

        let mut recovered = 0;
        for entry in pending {
            let request_id = entry.request_id.clone();
            match self
                .submit(&entry.hash, entry.max_length, Some(entry.request_id))
                .await
            {
                Ok(_) => {
                    recovered += 1;
                    tracing::info!("Recovered request {}", request_id);
                }
                Err(e) => {
                    tracing::error!("Failed to recover request {}: {}", request_id, e);
                }
            }
        }

        Ok(recovered)
    }

    /// Marks a request `ERROR` if no partition has reported yet.
    ///
    /// Returns whether the request was expired.
    pub fn expire(&self, request_id: &RequestId) -> bool {
        let Some(mut entry) = self.requests.get_mut(request_id) else {
            return false;
        };

        if entry.status != RequestStatus::InProgress {
            return false;
        }

        entry.status = RequestStatus::Error;
        tracing::info!("Request {} timed out", request_id);
        true
    }

    fn split_task(&self, request_id: &RequestId, hash: &str, keyspace: &Keyspace) -> Vec<WorkerTask> {
        let part_count = self.part_count();

        (0..part_count)
            .map(|part_number| {
                if let Some(range) = keyspace.partition(part_number, part_count) {
                    tracing::debug!(
                        "Request {} partition {} covers {}..{}",
                        request_id,
                        part_number,
                        range.start,
                        range.end
                    );
                }

                WorkerTask {
                    request_id: request_id.0.clone(),
                    hash: hash.to_string(),
                    alphabet: self.alphabet.clone(),
                    max_length: keyspace.length(),
                    part_number,
                    part_count,
                }
            })
            .collect()
    }

    /// Delivers every partition concurrently and waits for all of them.
    async fn dispatch_all(&self, request_id: &RequestId, tasks: Vec<WorkerTask>) -> Result<()> {
        let (sender, mut receiver) = mpsc::channel(tasks.len().max(1));
        let expected = tasks.len();

        for task in tasks {
            let sender = sender.clone();
            let dispatcher = self.dispatcher.clone();
            let worker_urls = self.worker_urls.clone();
            tokio::spawn(async move {
                let part_number = task.part_number;
                let delivered =
                    deliver_with_failover(dispatcher.as_ref(), &worker_urls, &task).await;
                let _ = sender.send((part_number, delivered)).await;
            });
        }
        drop(sender);

        let mut failed = Vec::new();
        let mut resolved = 0;
        while let Some((part_number, delivered)) = receiver.recv().await {
            resolved += 1;
            if !delivered {
                failed.push(part_number);
            }
        }

        if resolved < expected {
            tracing::error!(
                "Request {}: only {} of {} dispatch units resolved",
                request_id,
                resolved,
                expected
            );
        }

        if let Some(&part_number) = failed.iter().min() {
            tracing::error!(
                "Request {}: partitions {:?} could not be delivered to any worker",
                request_id,
                failed
            );
            return Err(CrackError::DispatchUnavailable {
                request_id: request_id.0.clone(),
                part_number,
            });
        }

        if resolved < expected {
            return Err(CrackError::Transport(format!(
                "dispatch of request {} was interrupted",
                request_id
            )));
        }

        Ok(())
    }

    fn spawn_watchdog(self: &Arc<Self>, request_id: RequestId) {
        let coordinator = Arc::clone(self);
        let ttl = self.ttl;

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            coordinator.expire(&request_id);
        });
    }
}

/// Tries the partition's own worker, then every other worker once, in order.
///
/// Returns whether some worker accepted the partition.
pub(crate) async fn deliver_with_failover(
    dispatcher: &dyn Dispatcher,
    worker_urls: &[String],
    task: &WorkerTask,
) -> bool {
    let primary = task.part_number as usize % worker_urls.len();

    match dispatcher.send_task(&worker_urls[primary], task).await {
        Ok(()) => return true,
        Err(e) => {
            tracing::warn!(
                "Failed to send partition {} of request {} to {}: {}",
                task.part_number,
                task.request_id,
                worker_urls[primary],
                e
            );
        }
    }

    for (index, worker_url) in worker_urls.iter().enumerate() {
        if index == primary {
            continue;
        }

        match dispatcher.send_task(worker_url, task).await {
            Ok(()) => {
                tracing::info!(
                    "Partition {} of request {} failed over to {}",
                    task.part_number,
                    task.request_id,
                    worker_url
                );
                return true;
            }
            Err(e) => {
                tracing::warn!(
                    "Failover of partition {} of request {} to {} failed: {}",
                    task.part_number,
                    task.request_id,
                    worker_url,
                    e
                );
            }
        }
    }

    false
}
