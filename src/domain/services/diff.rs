//! Diff domain service
//!
//! Generic attribute-equality diffing used by both the client syncer's
//! local-vs-mirror diff (C7 step 4) and the dev-server's
//! mirror-vs-synced diff (C5). Attribute comparison is field-wise at
//! nanosecond precision.

use crate::domain::value_objects::{FileAttributes, NormalizedPath};
use std::collections::BTreeMap;

/// Result of diffing a "desired" file set against a "current" one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffResult {
    /// Keys present (or changed) in desired but absent/stale in current.
    pub to_apply: Vec<NormalizedPath>,
    /// Keys present in current but absent from desired.
    pub to_remove: Vec<NormalizedPath>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.to_apply.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff two keyed attribute maps: `to_apply` holds every desired key that is
/// missing or attribute-unequal in `current`; `to_remove` holds every
/// current key absent from `desired`.
pub fn diff_attribute_maps(
    desired: &BTreeMap<NormalizedPath, FileAttributes>,
    current: &BTreeMap<NormalizedPath, FileAttributes>,
) -> DiffResult {
    let mut result = DiffResult::default();

    for (path, attrs) in desired {
        match current.get(path) {
            Some(existing) if existing == attrs => {}
            _ => result.to_apply.push(path.clone()),
        }
    }

    for path in current.keys() {
        if !desired.contains_key(path) {
            result.to_remove.push(path.clone());
        }
    }

    result.to_apply.sort_by_key(|p| p.to_string());
    result.to_remove.sort_by_key(|p| p.to_string());
    result
}
