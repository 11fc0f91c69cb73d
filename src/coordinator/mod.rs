//! Coordinator Module
//!
//! The manager side of the system. It owns the table of in-flight crack requests
//! and drives each of them from submission to a terminal state.
//!
//! ## Request Lifecycle
//! 1. **Submission**: A request is recorded as `IN_PROGRESS` and written to the
//!    ledger before anything is dispatched.
//! 2. **Fan-out**: The keyspace is cut into one partition per configured worker and
//!    every partition is delivered concurrently. A partition whose primary worker
//!    refuses it is offered to every other worker in turn.
//! 3. **Aggregation**: Each worker report appends its matches and bumps the
//!    completion counter. The first report moves the request to `PARTIAL_READY`;
//!    the last one to `READY`, which also clears the ledger entry.
//! 4. **Watchdog**: A one-shot timer flips a request that never heard back from any
//!    worker to `ERROR`.
//! 5. **Recovery**: On startup every ledger entry is resubmitted under its original id.
//!
//! ## Submodules
//! - **`coordinator`**: The request table and the lifecycle above.
//! - **`dispatch`**: Delivery of partition assignments to workers.
//! - **`ledger`**: Durable record of unfinished requests.
//! - **`types`**: Request state and identifiers.
//! - **`protocol`**: Public and internal HTTP contracts.
//! - **`handlers`**: Axum handlers and router.

pub mod coordinator;
pub mod dispatch;
pub mod handlers;
pub mod ledger;
pub mod protocol;
pub mod types;
