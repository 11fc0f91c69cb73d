//! Distributed Hash Cracker Library
//!
//! Brute-force recovery of an MD5 digest's plaintext, split across a fixed set of
//! remote workers. The binary (`main.rs`) runs either role.
//!
//! ## Architecture Modules
//! - **`coordinator`**: The manager. Accepts submissions, partitions the search space,
//!   dispatches partitions with failover, aggregates reports, expires stalled
//!   requests and replays unfinished ones from the ledger at startup.
//! - **`cracker`**: The worker. Enumerates one partition per assignment on a bounded
//!   pool and reports every match back to the manager exactly once.
//! - **`keyspace`**: Partition bounds and index-to-word mapping shared by both roles.
//! - **`probe`**: Liveness endpoint.
//! - **`config`**: Command line / environment configuration.
//! - **`error`**: Error taxonomy and its HTTP mapping.

pub mod config;
pub mod coordinator;
pub mod cracker;
pub mod error;
pub mod keyspace;
pub mod probe;
