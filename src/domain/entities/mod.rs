//! Domain Entities
//!
//! - `SourceFile` / `MirrorFile` / `DestinationFile` — the three file
//!   shapes that flow through the sync pipeline (C3/C4/C5).
//! - `Workspace` / `Service` / `Tunnel` — the user-facing configuration
//!   model (C10).
//! - `MicroserviceRecord` / `DevStatus` — the cluster-visible status
//!   object the dev-server publishes to (C9).

mod destination_file;
mod microservice;
mod mirror_file;
mod source_file;
mod workspace;

pub use destination_file::DestinationFile;
pub use microservice::{DevStatus, MicroserviceRecord};
pub use mirror_file::MirrorFile;
pub use source_file::SourceFile;
pub use workspace::{ManifestSource, Service, Tunnel, Workspace};
