//! Manager Network Protocol
//!
//! Public API consumed by clients and the internal endpoint on which workers
//! report finished partitions. All bodies are JSON with camelCase fields.

use super::types::RequestStatus;
use serde::{Deserialize, Serialize};

/// Public endpoint for submitting a hash.
pub const ENDPOINT_CRACK: &str = "/api/hash/crack";
/// Public endpoint for polling a request (`?requestId=`).
pub const ENDPOINT_STATUS: &str = "/api/hash/status";
/// Internal endpoint on which workers report partition results.
pub const ENDPOINT_PARTITION_REPORT: &str = "/internal/api/manager/hash/crack/request";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackHashRequest {
    pub hash: String,
    pub max_length: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackHashResponse {
    pub request_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    pub request_id: Option<String>,
}

/// Status snapshot. `data` and `progress` are omitted once a request is `ERROR`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CrackStatusResponse {
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
}

/// Result of one partition, sent once by the worker that ran it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionReport {
    pub request_id: String,
    #[serde(default)]
    pub words: Vec<String>,
}
