//! Worker Network Protocol
//!
//! The partition assignment sent by the manager to a worker. Field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Endpoint on which workers accept partition assignments.
pub const ENDPOINT_CRACK_TASK: &str = "/internal/api/worker/hash/crack/task";

/// One partition of one crack request.
///
/// Immutable once created; the manager builds one per partition and the worker
/// derives its index range from `part_number` and `part_count` alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTask {
    pub request_id: String,
    /// Lowercase hex digest to recover.
    pub hash: String,
    /// Ordered digit set used to spell candidates.
    pub alphabet: String,
    /// Exact length of every candidate word.
    pub max_length: u32,
    /// 0-based partition index.
    pub part_number: u32,
    /// Total number of partitions for this request.
    pub part_count: u32,
}
