//! Fingerprinter domain service (C2, snapshot-level)
//!
//! Per-file hashing lives in `infrastructure::fs` (it touches disk); this
//! service computes the deterministic snapshot `Version` from an already
//! fingerprinted file list plus a `SyncConfig`:
//!
//! > for files sorted by `sync_source_path`, emit `"<path>: <per-file-version>\n"`
//! > then append `"SyncConfig: <rules-version>"`, hash.

use crate::domain::value_objects::{FileAttributes, NormalizedPath, SyncConfig, Version};

#[derive(Debug, Clone, Copy, Default)]
pub struct Fingerprinter;

impl Fingerprinter {
    pub fn new() -> Self {
        Self
    }

    /// `entries` need not be pre-sorted; this function sorts by
    /// `sync_source_path` before hashing so snapshot iteration order never
    /// affects the result.
    pub fn snapshot_version<'a>(
        &self,
        entries: impl IntoIterator<Item = (&'a NormalizedPath, &'a FileAttributes)>,
        config: &SyncConfig,
    ) -> Version {
        let mut sorted: Vec<(&NormalizedPath, &FileAttributes)> = entries.into_iter().collect();
        sorted.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));

        let mut text = String::new();
        for (path, attrs) in sorted {
            text.push_str(&format!("{}: {}\n", path, attrs.version()));
        }
        text.push_str(&format!("SyncConfig: {}", config.version()));

        Version::of_bytes(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ModTime, SyncRule};

    fn attrs(nanos: i128) -> FileAttributes {
        FileAttributes::new(b"hello", 0o644, ModTime::from_unix_nanos(nanos))
    }

    fn config() -> SyncConfig {
        SyncConfig {
            name: "api".to_string(),
            rules: vec![SyncRule::new("src".into(), "dst".into())],
            sync_command: vec!["node".to_string()],
            init_command: vec![],
            image: None,
        }
    }

    #[test]
    fn version_invariant_under_iteration_order() {
        let a_path: NormalizedPath = "a.js".into();
        let b_path: NormalizedPath = "b.js".into();
        let a_attrs = attrs(1);
        let b_attrs = attrs(2);
        let cfg = config();

        let fp = Fingerprinter::new();
        let v1 = fp.snapshot_version(vec![(&a_path, &a_attrs), (&b_path, &b_attrs)], &cfg);
        let v2 = fp.snapshot_version(vec![(&b_path, &b_attrs), (&a_path, &a_attrs)], &cfg);
        assert_eq!(v1, v2);
    }

    #[test]
    fn version_changes_when_contents_change() {
        let path: NormalizedPath = "a.js".into();
        let cfg = config();
        let fp = Fingerprinter::new();

        let v1 = fp.snapshot_version(vec![(&path, &attrs(1))], &cfg);
        let v2 = fp.snapshot_version(vec![(&path, &attrs(2))], &cfg);
        assert_ne!(v1, v2);
    }

    #[test]
    fn empty_snapshot_has_stable_version() {
        let cfg = config();
        let fp = Fingerprinter::new();
        let v1 = fp.snapshot_version(Vec::<(&NormalizedPath, &FileAttributes)>::new(), &cfg);
        let v2 = fp.snapshot_version(Vec::<(&NormalizedPath, &FileAttributes)>::new(), &cfg);
        assert_eq!(v1, v2);
    }
}
