//! Synced tracker (C5)
//!
//! Only the dev-server's child manager mutates this tracker, so a
//! plain `Mutex` is sufficient — no need for the extra
//! snapshot-on-read discipline `MirrorTracker` has.

use crate::domain::entities::{DestinationFile, MirrorFile};
use crate::domain::services::diff::{diff_attribute_maps, DiffResult};
use crate::domain::services::expected_destinations::compute_expected_destinations;
use crate::domain::services::path_matcher::DirectoryProbe;
use crate::domain::value_objects::{FileAttributes, NormalizedPath, SyncConfig, Version};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct SyncedTracker {
    files: Mutex<BTreeMap<NormalizedPath, DestinationFile>>,
}

impl SyncedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn synced(&self, file: DestinationFile) {
        self.files
            .lock()
            .expect("synced tracker mutex poisoned")
            .insert(file.sync_destination_path.clone(), file);
    }

    pub fn removed(&self, sync_destination_path: &NormalizedPath) {
        self.files
            .lock()
            .expect("synced tracker mutex poisoned")
            .remove(sync_destination_path);
    }

    pub fn files(&self) -> BTreeMap<NormalizedPath, DestinationFile> {
        self.files.lock().expect("synced tracker mutex poisoned").clone()
    }

    /// Reconstruct a pseudo-LocalSnapshot by keying each synced entry
    /// under its `sync_source_path` (dropping the destination) and
    /// combine with `config`. Equals the client's computed version iff
    /// the destination tree matches what the client's snapshot maps to.
    pub fn version(&self, config: &SyncConfig) -> Version {
        let files = self.files();
        let by_source: BTreeMap<NormalizedPath, FileAttributes> = files
            .values()
            .map(|f| (f.sync_source_path.clone(), f.attributes.clone()))
            .collect();

        crate::domain::services::fingerprint::Fingerprinter::new()
            .snapshot_version(by_source.iter(), config)
    }

    /// Compute `to_copy`/`to_remove` against a mirror snapshot.
    pub fn diff(
        &self,
        mirror_snapshot: &BTreeMap<NormalizedPath, MirrorFile>,
        config: &SyncConfig,
        probe: &impl DirectoryProbe,
    ) -> (DiffResult, BTreeMap<NormalizedPath, DestinationFile>) {
        let expected = compute_expected_destinations(mirror_snapshot, config, probe);

        let expected_attrs: BTreeMap<NormalizedPath, FileAttributes> = expected
            .iter()
            .map(|(path, file)| (path.clone(), file.attributes.clone()))
            .collect();

        let current = self.files();
        let current_attrs: BTreeMap<NormalizedPath, FileAttributes> = current
            .iter()
            .map(|(path, file)| (path.clone(), file.attributes.clone()))
            .collect();

        (diff_attribute_maps(&expected_attrs, &current_attrs), expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ModTime, SyncRule};
    use std::path::PathBuf;

    fn attrs(nanos: i128) -> FileAttributes {
        FileAttributes::new(b"x", 0o644, ModTime::from_unix_nanos(nanos))
    }

    fn config() -> SyncConfig {
        SyncConfig {
            name: "api".to_string(),
            rules: vec![SyncRule::new("src".into(), "dst".into())],
            sync_command: vec![],
            init_command: vec![],
            image: None,
        }
    }

    struct NoDirs;
    impl DirectoryProbe for NoDirs {
        fn is_dir(&self, _path: &NormalizedPath) -> bool {
            false
        }
    }

    #[test]
    fn version_stable_when_tracker_unchanged() {
        let tracker = SyncedTracker::new();
        let rule = SyncRule::new("src".into(), "dst".into());
        tracker.synced(DestinationFile::new(
            "dst/a.js".into(),
            "src/a.js".into(),
            attrs(1),
            rule,
        ));

        let v1 = tracker.version(&config());
        let v2 = tracker.version(&config());
        assert_eq!(v1, v2);
    }

    #[test]
    fn diff_reports_missing_destination_as_to_apply() {
        let tracker = SyncedTracker::new();
        let mut mirror = BTreeMap::new();
        mirror.insert(
            NormalizedPath::from("src/a.js"),
            MirrorFile::new("src/a.js".into(), PathBuf::from("/stage/1"), attrs(1)),
        );

        let (diff, _expected) = tracker.diff(&mirror, &config(), &NoDirs);
        assert_eq!(diff.to_apply, vec![NormalizedPath::from("dst/a.js")]);
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn diff_reports_stale_destination_as_to_remove() {
        let tracker = SyncedTracker::new();
        let rule = SyncRule::new("src".into(), "dst".into());
        tracker.synced(DestinationFile::new(
            "dst/gone.js".into(),
            "src/gone.js".into(),
            attrs(1),
            rule,
        ));

        let mirror = BTreeMap::new();
        let (diff, _expected) = tracker.diff(&mirror, &config(), &NoDirs);
        assert_eq!(diff.to_remove, vec![NormalizedPath::from("dst/gone.js")]);
    }
}
