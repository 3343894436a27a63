//! SourceFile Entity (C3)
//!
//! `{ sync_source_path, contents_path, attributes }` — a file discovered
//! by the local snapshot walker, keyed in sync-rule space.

use crate::domain::value_objects::{FileAttributes, NormalizedPath};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path in terms of sync-rule space, e.g. `rel-dir/file` under `from=rel-dir`.
    pub sync_source_path: NormalizedPath,
    /// Path the process can actually open; differs across machines.
    pub contents_path: PathBuf,
    pub attributes: FileAttributes,
}

impl SourceFile {
    pub fn new(
        sync_source_path: NormalizedPath,
        contents_path: PathBuf,
        attributes: FileAttributes,
    ) -> Self {
        Self {
            sync_source_path,
            contents_path,
            attributes,
        }
    }
}
