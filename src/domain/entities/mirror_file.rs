//! MirrorFile Entity (C4)
//!
//! Same shape as `SourceFile`, but lives on the pod: `contents_path`
//! points into a staging directory with an opaque filename, so staging
//! writes never collide with destination files in progress.

use crate::domain::value_objects::{FileAttributes, NormalizedPath};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorFile {
    pub sync_source_path: NormalizedPath,
    /// Private to the dev-server; clients never reference it.
    pub contents_path: PathBuf,
    pub attributes: FileAttributes,
}

impl MirrorFile {
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
