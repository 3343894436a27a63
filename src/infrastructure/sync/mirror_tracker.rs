//! Mirror tracker (C4)
//!
//! Thread-safe map from `sync_source_path` to the staged `MirrorFile` the
//! dev-server wrote it to. `Mutex`-guarded; `snapshot()` value-copies so
//! callers iterate lock-free.

use crate::domain::entities::MirrorFile;
use crate::domain::value_objects::NormalizedPath;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MirrorTracker {
    files: Mutex<BTreeMap<NormalizedPath, MirrorFile>>,
}

impl MirrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly mirrored file. If a prior entry existed under the
    /// same source path, its staged contents are deleted best-effort —
    /// failures are logged, never propagated.
    pub fn mirrored(&self, file: MirrorFile) {
        let mut files = self.files.lock().expect("mirror tracker mutex poisoned");
        if let Some(prior) = files.insert(file.sync_source_path.clone(), file) {
            if let Err(err) = std::fs::remove_file(&prior.contents_path) {
                tracing::warn!(
                    path = %prior.contents_path.display(),
                    error = %err,
                    "failed to delete superseded staged file"
                );
            }
        }
    }

    /// Drop the mapping and best-effort delete its staged file.
    pub fn removed(&self, sync_source_path: &NormalizedPath) {
        let mut files = self.files.lock().expect("mirror tracker mutex poisoned");
        if let Some(file) = files.remove(sync_source_path) {
            if let Err(err) = std::fs::remove_file(&file.contents_path) {
                tracing::warn!(
                    path = %file.contents_path.display(),
                    error = %err,
                    "failed to delete removed staged file"
                );
            }
        }
    }

    /// Value-copied snapshot of the whole tracker.
    pub fn snapshot(&self) -> BTreeMap<NormalizedPath, MirrorFile> {
        self.files.lock().expect("mirror tracker mutex poisoned").clone()
    }

    pub fn get(&self, sync_source_path: &NormalizedPath) -> Option<MirrorFile> {
        self.files
            .lock()
            .expect("mirror tracker mutex poisoned")
            .get(sync_source_path)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FileAttributes, ModTime};
    use std::path::PathBuf;

    fn mirror_file(source: &str, staged: &str) -> MirrorFile {
        MirrorFile::new(
            source.into(),
            PathBuf::from(staged),
            FileAttributes::new(b"x", 0o644, ModTime::from_unix_nanos(0)),
        )
    }

    #[test]
    fn mirrored_then_get_round_trips() {
        let tracker = MirrorTracker::new();
        tracker.mirrored(mirror_file("a.js", "/tmp/does-not-exist-stage-1"));

        let got = tracker.get(&NormalizedPath::from("a.js")).unwrap();
        assert_eq!(got.contents_path, PathBuf::from("/tmp/does-not-exist-stage-1"));
    }

    #[test]
    fn removed_drops_mapping() {
        let tracker = MirrorTracker::new();
        tracker.mirrored(mirror_file("a.js", "/tmp/does-not-exist-stage-2"));
        tracker.removed(&NormalizedPath::from("a.js"));

        assert!(tracker.get(&NormalizedPath::from("a.js")).is_none());
    }

    #[test]
    fn snapshot_is_a_value_copy() {
        let tracker = MirrorTracker::new();
        tracker.mirrored(mirror_file("a.js", "/tmp/does-not-exist-stage-3"));

        let snapshot = tracker.snapshot();
        tracker.removed(&NormalizedPath::from("a.js"));

        assert!(snapshot.contains_key(&NormalizedPath::from("a.js")));
        assert!(tracker.get(&NormalizedPath::from("a.js")).is_none());
    }
}
