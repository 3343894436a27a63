//! Expected-destinations domain service (C5 Diff step 1)
//!
//! For each mirror file, for each sync rule whose `destination` returns a
//! path, construct a `DestinationFile` (multiple rules hitting one
//! destination append to its `rules` list). When two distinct mirror
//! source-paths would collide on the same destination, keep the first
//! encountered and log the second as dropped.

use crate::domain::entities::{DestinationFile, MirrorFile};
use crate::domain::services::path_matcher::{DirectoryProbe, PathMatcher};
use crate::domain::value_objects::{NormalizedPath, SyncConfig};
use std::collections::BTreeMap;

/// Computed in rule-declaration order so "keep the first encountered" on a
/// destination collision is deterministic given a fixed rule order.
pub fn compute_expected_destinations(
    mirror_files: &BTreeMap<NormalizedPath, MirrorFile>,
    config: &SyncConfig,
    probe: &impl DirectoryProbe,
) -> BTreeMap<NormalizedPath, DestinationFile> {
    let matcher = PathMatcher::new();
    let mut expected: BTreeMap<NormalizedPath, DestinationFile> = BTreeMap::new();

    // Iterate mirror files in sorted source-path order for determinism.
    for mirror_file in mirror_files.values() {
        for rule in &config.rules {
            let Some(destination) =
                matcher.destination(rule, &mirror_file.sync_source_path, probe)
            else {
                continue;
            };

            match expected.get_mut(&destination) {
                Some(existing) if existing.sync_source_path == mirror_file.sync_source_path => {
                    existing.add_rule(rule.clone());
                }
                Some(_) => {
                    tracing::warn!(
                        destination = %destination,
                        dropped_source = %mirror_file.sync_source_path,
                        "destination collision: keeping first-encountered source"
                    );
                }
                None => {
                    expected.insert(
                        destination.clone(),
                        DestinationFile::new(
                            destination,
                            mirror_file.sync_source_path.clone(),
                            mirror_file.attributes.clone(),
                            rule.clone(),
                        ),
                    );
                }
            }
        }
    }

    expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FileAttributes, ModTime, SyncRule};
    use std::path::PathBuf;

    struct NoDirs;
    impl DirectoryProbe for NoDirs {
        fn is_dir(&self, _path: &NormalizedPath) -> bool {
            false
        }
    }

    fn mirror_file(source: &str, staged_at: &str) -> MirrorFile {
        MirrorFile::new(
            source.into(),
            PathBuf::from(staged_at),
            FileAttributes::new(b"x", 0o644, ModTime::from_unix_nanos(0)),
        )
    }

    #[test]
    fn single_rule_maps_one_destination() {
        let mut mirror = BTreeMap::new();
        mirror.insert(NormalizedPath::from("src/a.js"), mirror_file("src/a.js", "/stage/1"));

        let config = SyncConfig {
            name: "api".to_string(),
            rules: vec![SyncRule::new("src".into(), "dst".into())],
            sync_command: vec![],
            init_command: vec![],
            image: None,
        };

        let expected = compute_expected_destinations(&mirror, &config, &NoDirs);
        assert_eq!(expected.len(), 1);
        assert!(expected.contains_key(&NormalizedPath::from("dst/a.js")));
    }

    #[test]
    fn two_rules_same_source_stack_on_one_destination() {
        let mut mirror = BTreeMap::new();
        mirror.insert(
            NormalizedPath::from("package.json"),
            mirror_file("package.json", "/stage/1"),
        );

        let mut trigger_rule = SyncRule::new("package.json".into(), "package.json".into());
        trigger_rule.trigger_init = true;
        let config = SyncConfig {
            name: "api".to_string(),
            rules: vec![
                SyncRule::new("package.json".into(), "package.json".into()),
                trigger_rule,
            ],
            sync_command: vec![],
            init_command: vec![],
            image: None,
        };

        let expected = compute_expected_destinations(&mirror, &config, &NoDirs);
        let dest = expected.get(&NormalizedPath::from("package.json")).unwrap();
        assert_eq!(dest.rules.len(), 2);
        assert!(dest.triggers_init());
    }

    #[test]
    fn distinct_sources_colliding_on_destination_keep_first() {
        let mut mirror = BTreeMap::new();
        mirror.insert(NormalizedPath::from("a"), mirror_file("a", "/stage/a"));
        mirror.insert(NormalizedPath::from("b"), mirror_file("b", "/stage/b"));

        let config = SyncConfig {
            name: "api".to_string(),
            rules: vec![
                SyncRule::new("a".into(), "dst".into()),
                SyncRule::new("b".into(), "dst".into()),
            ],
            sync_command: vec![],
            init_command: vec![],
            image: None,
        };

        let expected = compute_expected_destinations(&mirror, &config, &NoDirs);
        assert_eq!(expected.len(), 1);
        let dest = expected.get(&NormalizedPath::from("dst")).unwrap();
        assert_eq!(dest.sync_source_path, NormalizedPath::from("a"));
    }

    #[test]
    fn destination_collision_stacking_rules_for_same_distinct_destinations() {
        // file1 under "." -> "." and "." -> "new-dir" both apply; two distinct
        // destinations, not a collision.
        let mut mirror = BTreeMap::new();
        mirror.insert(NormalizedPath::from("file1"), mirror_file("file1", "/stage/file1"));

        let config = SyncConfig {
            name: "api".to_string(),
            rules: vec![
                SyncRule::new(".".into(), ".".into()),
                SyncRule::new(".".into(), "new-dir".into()),
            ],
            sync_command: vec![],
            init_command: vec![],
            image: None,
        };

        let expected = compute_expected_destinations(&mirror, &config, &NoDirs);
        assert!(expected.contains_key(&NormalizedPath::from("file1")));
        assert!(expected.contains_key(&NormalizedPath::from("new-dir/file1")));
    }
}
