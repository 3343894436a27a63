//! Status reconciler loop (C9)
//!
//! Publishes the dev-server's in-memory `DevStatus` to the cluster-visible
//! microservice record whenever it changes, driven by a coalesced trigger
//! channel plus a 30s fallback timer . Runs on a dedicated
//! thread: `MicroserviceStore` is a blocking port, not an async one.

use crate::domain::entities::DevStatus;
use crate::domain::ports::{MicroserviceStore, StoreError};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(30);
const CONFLICT_RETRY_DELAYS_MS: [u64; 3] = [100, 500, 1000];

/// Drives reconciliation until `trigger_rx`'s sender is dropped.
pub fn run(
    store: &impl MicroserviceStore,
    service: &str,
    spec_version: u64,
    trigger_rx: &Receiver<()>,
    current: impl Fn() -> DevStatus,
) {
    loop {
        match trigger_rx.recv_timeout(POLL_INTERVAL) {
            Ok(()) => drain(trigger_rx),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return,
        }

        let status = current();
        if let Err(err) = reconcile_once(store, service, spec_version, &status) {
            tracing::warn!(service, error = %err, "status reconcile failed");
        }
    }
}

fn drain(rx: &Receiver<()>) {
    while rx.try_recv().is_ok() {}
}

/// One reconcile attempt: skip if our `spec_version` is stale, otherwise
/// compare-and-set with bounded retry on `StoreError::Conflict`.
pub fn reconcile_once(
    store: &impl MicroserviceStore,
    service: &str,
    spec_version: u64,
    status: &DevStatus,
) -> Result<bool, StoreError> {
    let mut attempt = 0usize;
    loop {
        let record = store.get(service)?;
        if !record.accepts_update_from(spec_version) {
            tracing::info!(service, "spec_version stale, dropping status update");
            return Ok(false);
        }
        if record.dev_status == *status {
            return Ok(false);
        }

        match store.compare_and_set_status(service, record.spec_version, status.clone()) {
            Ok(()) => return Ok(true),
            Err(StoreError::Conflict(_)) if attempt < CONFLICT_RETRY_DELAYS_MS.len() => {
                std::thread::sleep(Duration::from_millis(CONFLICT_RETRY_DELAYS_MS[attempt]));
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
