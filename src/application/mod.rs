//! Application layer: one module per use case, each a thin orchestration
//! over domain services and infrastructure ports.

pub mod manage_once;
pub mod status_reconciler;
pub mod sync_once;
pub mod validate_workspace;

pub use manage_once::ChildManager;
pub use sync_once::{sync_once, SyncOnceReport, MIRROR_WORKER_COUNT};
pub use validate_workspace::validate_workspace;
