//! Cracker Worker Pool
//!
//! Bounded job queue drained by a fixed number of loops. Acceptance never waits
//! for a free slot: a full queue is refused so the manager can fail over to
//! another worker.
//!
//! ## Responsibilities
//! - **Admission**: validating assignments and enqueueing them.
//! - **Execution**: running enumeration off the async threads.
//! - **Completion**: sending exactly one report per finished assignment.

use super::engine;
use super::protocol::WorkerTask;
use super::reporter::Reporter;
use crate::error::{CrackError, Result};

use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};

pub struct CrackerPool {
    sender: mpsc::Sender<WorkerTask>,
}

impl CrackerPool {
    /// Creates the queue and spawns `threads` loops draining it.
    ///
    /// `capacity` is clamped to at least one slot.
    pub fn start(reporter: Arc<dyn Reporter>, threads: usize, capacity: usize) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        for worker_id in 0..threads {
            let receiver = receiver.clone();
            let reporter = reporter.clone();
            tokio::spawn(async move {
                worker_loop(worker_id, receiver, reporter).await;
            });
        }

        tracing::info!(
            "Cracker pool started with {} workers (queue capacity {})",
            threads,
            capacity.max(1)
        );

        Arc::new(Self { sender })
    }

    /// Validates and enqueues an assignment. Returns as soon as it is queued.
    pub fn accept(&self, task: WorkerTask) -> Result<()> {
        engine::validate(&task)?;

        let request_id = task.request_id.clone();
        let part_number = task.part_number;

        match self.sender.try_send(task) {
            Ok(()) => {
                tracing::info!(
                    "Accepted partition {} of request {}",
                    part_number,
                    request_id
                );
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "Queue full, refusing partition {} of request {}",
                    part_number,
                    request_id
                );
                Err(CrackError::Transport("worker queue is full".to_string()))
            }
            Err(TrySendError::Closed(_)) => {
                Err(CrackError::Transport("worker pool stopped".to_string()))
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<WorkerTask>>>,
    reporter: Arc<dyn Reporter>,
) {
    tracing::debug!("Cracker worker {} started", worker_id);

    loop {
        // Lock is only held while waiting, never while cracking
        let task = receiver.lock().await.recv().await;
        let Some(task) = task else {
            break;
        };

        run_task(worker_id, task, reporter.as_ref()).await;
    }

    tracing::debug!("Cracker worker {} stopped", worker_id);
}

async fn run_task(worker_id: usize, task: WorkerTask, reporter: &dyn Reporter) {
    let request_id = task.request_id.clone();
    let part_number = task.part_number;

    let words = match tokio::task::spawn_blocking(move || engine::crack_partition(&task)).await {
        Ok(Ok(words)) => words,
        Ok(Err(e)) => {
            tracing::error!(
                "Worker {} could not run partition {} of request {}: {}",
                worker_id,
                part_number,
                request_id,
                e
            );
            return;
        }
        Err(e) => {
            tracing::error!(
                "Worker {} panicked on partition {} of request {}: {}",
                worker_id,
                part_number,
                request_id,
                e
            );
            return;
        }
    };

    let found = words.len();
    match reporter.send_result(&request_id, words).await {
        Ok(()) => tracing::info!(
            "Partition {} of request {} completed ({} matches)",
            part_number,
            request_id,
            found
        ),
        Err(e) => tracing::error!(
            "Failed to report partition {} of request {}: {}",
            part_number,
            request_id,
            e
        ),
    }
}
