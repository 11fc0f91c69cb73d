//! Cracker Engine Module
//!
//! The worker side of the system. A worker receives one partition assignment at a
//! time from the manager, enumerates every word of its index range, hashes each
//! candidate and reports all matches back exactly once.
//!
//! ## Execution Model
//! 1. **Acceptance**: The HTTP handler validates the assignment and pushes it into a
//!    bounded job queue. The manager gets its acknowledgement before any work starts.
//! 2. **Execution**: A fixed set of pool loops drain the queue; the CPU-bound
//!    enumeration runs on the blocking thread pool.
//! 3. **Reporting**: When the range is exhausted the loop sends one report (possibly
//!    with no words) to the manager. A failed report is logged and never retried.
//!
//! Jobs are fire-and-forget: there is no cancellation handle.
//!
//! ## Submodules
//! - **`engine`**: Validation, enumeration and digest matching for one assignment.
//! - **`pool`**: Bounded job queue and the loops that drain it.
//! - **`reporter`**: Delivery of partition results to the manager.
//! - **`protocol`**: The assignment wire type and worker endpoints.
//! - **`handlers`**: Axum handlers and router.

pub mod engine;
pub mod handlers;
pub mod pool;
pub mod protocol;
pub mod reporter;

#[cfg(test)]
mod tests;
