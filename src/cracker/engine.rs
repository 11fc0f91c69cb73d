//! Partition enumeration and matching.
//!
//! Everything here is synchronous and deterministic: running the same assignment
//! twice yields the same matches in the same order.

use super::protocol::WorkerTask;
use crate::error::{CrackError, Result};
use crate::keyspace::Keyspace;

use md5::{Digest, Md5};

/// Lowercase hex MD5 of `input`.
pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Rejects assignments the engine cannot run and returns their keyspace.
pub fn validate(task: &WorkerTask) -> Result<Keyspace> {
    if task.alphabet.is_empty() {
        return Err(CrackError::Validation("missing alphabet".to_string()));
    }
    if task.max_length == 0 {
        return Err(CrackError::Validation(
            "maxLength must be greater than zero".to_string(),
        ));
    }
    if task.part_count == 0 {
        return Err(CrackError::Validation(
            "partCount must be greater than zero".to_string(),
        ));
    }
    if task.part_number >= task.part_count {
        return Err(CrackError::Validation(format!(
            "partNumber {} out of range for partCount {}",
            task.part_number, task.part_count
        )));
    }

    Keyspace::new(&task.alphabet, task.max_length).ok_or_else(|| {
        CrackError::Validation(format!(
            "search space {}^{} is too large",
            task.alphabet.chars().count(),
            task.max_length
        ))
    })
}

/// Enumerates the assignment's whole range and returns every word whose digest
/// equals `task.hash`, in ascending index order.
///
/// Does not stop at the first hit.
pub fn crack_partition(task: &WorkerTask) -> Result<Vec<String>> {
    let keyspace = validate(task)?;
    let range = keyspace
        .partition(task.part_number, task.part_count)
        .ok_or_else(|| CrackError::Validation("invalid partition".to_string()))?;

    tracing::info!(
        "Starting partition {}/{} of request {} (indices {}..{})",
        task.part_number,
        task.part_count,
        task.request_id,
        range.start,
        range.end
    );

    let mut matches = Vec::new();
    for word in keyspace.words(range) {
        if md5_hex(&word) == task.hash {
            tracing::info!("Found matching word for request {}: {}", task.request_id, word);
            matches.push(word);
        }
    }

    Ok(matches)
}
