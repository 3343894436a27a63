//! MicroserviceStore port (C9)
//!
//! Abstraction over the cluster-visible custom resource holding each
//! service's `MicroserviceRecord` (spec_version + dev_status), shaped
//! around the Kubernetes custom-resource status subresource pattern.

use crate::domain::entities::{DevStatus, MicroserviceRecord};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    /// Optimistic-concurrency conflict; caller should re-fetch and retry.
    Conflict(String),
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(name) => write!(f, "microservice not found: {}", name),
            StoreError::Conflict(name) => write!(f, "conflicting update for: {}", name),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Compare-and-set access to a single service's dev status record.
pub trait MicroserviceStore {
    /// Fetch the current record for `service`.
    fn get(&self, service: &str) -> StoreResult<MicroserviceRecord>;

    /// Update only the `status.devStatus` subresource, compare-and-set
    /// against `expected_spec_version`. Returns `StoreError::Conflict` if
    /// the record was already updated to a newer spec_version by someone
    /// else.
    fn compare_and_set_status(
        &self,
        service: &str,
        expected_spec_version: u64,
        dev_status: DevStatus,
    ) -> StoreResult<()>;
}
