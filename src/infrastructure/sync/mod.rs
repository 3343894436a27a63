//! Sync infrastructure: the local snapshot walker (C3) and the
//! dev-server's two trackers (C4, C5).

pub mod local_snapshot;
pub mod mirror_tracker;
pub mod synced_tracker;

pub use local_snapshot::{snapshot as local_snapshot, RealProbe};
pub use mirror_tracker::MirrorTracker;
pub use synced_tracker::SyncedTracker;
