use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a crack request.
///
/// Fresh requests get a UUID v4; recovered requests keep the id they were
/// persisted under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a crack request.
///
/// ```text
/// IN_PROGRESS --first report--> PARTIAL_READY --last report--> READY
///      |
///      +--watchdog, no reports--> ERROR
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    InProgress,
    Ready,
    Error,
    PartialReady,
}

/// In-memory state of one crack request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashData {
    pub request_id: RequestId,
    pub status: RequestStatus,
    /// Matched words in report arrival order.
    pub data: Vec<String>,
    /// Number of partition reports received so far.
    pub completed_partitions: u32,
}

impl HashData {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            status: RequestStatus::InProgress,
            data: Vec::new(),
            completed_partitions: 0,
        }
    }

    /// Completion percentage, floored. Capped at 100 because duplicate reports
    /// are counted.
    pub fn progress(&self, part_count: u32) -> u32 {
        if part_count == 0 {
            return 0;
        }
        let percent = self.completed_partitions as u64 * 100 / part_count as u64;
        percent.min(100) as u32
    }
}

/// The durable subset of a request kept in the ledger until it is `READY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRequest {
    pub request_id: RequestId,
    pub hash: String,
    pub max_length: u32,
}
