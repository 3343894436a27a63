//! Infrastructure Layer
//!
//! Concrete implementations of domain ports. This layer handles all I/O:
//! disk, gRPC, filesystem watching, child processes, and the Kubernetes
//! API.
//!
//! ## Structure
//!
//! - `fs/` - `FileSystem` implementation (Local)
//! - `sync/` - mirror/synced trackers and the local snapshot walker
//! - `rpc/` - gRPC sync service (client + server)
//! - `watch/` - laptop filesystem watcher
//! - `process/` - managed child process group
//! - `k8s/` - `MicroserviceStore` implementation
//! - `config/` - strict YAML config file loaders

pub mod config;
pub mod fs;
pub mod k8s;
pub mod process;
pub mod rpc;
pub mod sync;
pub mod watch;

pub use fs::LocalFs;
