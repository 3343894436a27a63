//! Kelda - per-developer Kubernetes namespaces with continuous file sync
//!
//! Kelda provisions a namespace per developer and keeps a laptop working
//! tree mirrored into a running dev pod: a client-side syncer walks the
//! sync rules and streams changed files to the dev-server over gRPC,
//! which stages them, verifies the transfer, and restarts the service's
//! managed process whenever the synced tree's version changes.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{KeldaError, KeldaResult};
