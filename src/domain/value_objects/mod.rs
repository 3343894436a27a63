//! Domain Value Objects
//!
//! Immutable value types representing the sync pipeline's vocabulary:
//! `FileAttributes`/`Version` (C2), `NormalizedPath` (C1), `SyncRule` and
//! `SyncConfig` (C3/C10), `Namespace` (C10 user configuration).

mod file_attributes;
mod namespace;
mod normalized_path;
mod sync_config;
mod sync_rule;

pub use file_attributes::{FileAttributes, ModTime, Version};
pub use namespace::Namespace;
pub use normalized_path::NormalizedPath;
pub use sync_config::SyncConfig;
pub use sync_rule::{SyncRule, IMPLICIT_EXCEPTIONS};
