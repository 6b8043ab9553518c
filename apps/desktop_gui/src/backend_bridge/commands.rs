//! Backend commands queued from UI to backend worker.

use client_core::BackendRequest;

pub struct BackendCommand {
    /// Correlates the queued command with its completion event in logs.
    pub id: u64,
    pub request: BackendRequest,
}
