//! Path matcher domain service (C1)
//!
//! Applies a sync rule's `from`/`except` patterns to a normalized path
//! and computes its destination path.

use crate::domain::value_objects::{NormalizedPath, SyncRule};

/// Injected so `applies_to`/`destination` stay unit-testable without a real
/// filesystem — the "existing directory on the local filesystem at the
/// moment of evaluation" check is the only I/O this service performs.
pub trait DirectoryProbe {
    fn is_dir(&self, path: &NormalizedPath) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealDirectoryProbe;

impl DirectoryProbe for RealDirectoryProbe {
    fn is_dir(&self, path: &NormalizedPath) -> bool {
        path.as_path().is_dir()
    }
}

/// Stateless path-matching logic for a single sync rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathMatcher;

impl PathMatcher {
    pub fn new() -> Self {
        Self
    }

    /// True iff `path == rule.from` or `path` descends from it, and `path`
    /// is not equal to or a descendant of any `rule.from / except[i]`.
    pub fn applies_to(&self, rule: &SyncRule, path: &NormalizedPath) -> bool {
        if rule.from.is_absolute() != path.is_absolute() {
            return false;
        }
        if !rule.from.contains(path) {
            return false;
        }
        for except in &rule.except {
            let excluded_root = rule.from.join(except);
            if excluded_root.contains(path) {
                return false;
            }
        }
        true
    }

    /// Returns `None` if `applies_to` is false. Handles the
    /// exact-match-is-a-directory special case.
    pub fn destination(
        &self,
        rule: &SyncRule,
        path: &NormalizedPath,
        probe: &impl DirectoryProbe,
    ) -> Option<NormalizedPath> {
        if !self.applies_to(rule, path) {
            return None;
        }

        if path == &rule.from {
            if probe.is_dir(&rule.to) {
                let basename = path.file_name().map(|n| n.to_os_string());
                return Some(match basename {
                    Some(name) => rule.to.join(name),
                    None => rule.to.clone(),
                });
            }
            return Some(rule.to.clone());
        }

        let relative = rule.from.strip_prefix(path)?;
        Some(rule.to.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProbe {
        dirs: Vec<NormalizedPath>,
    }

    impl DirectoryProbe for FakeProbe {
        fn is_dir(&self, path: &NormalizedPath) -> bool {
            self.dirs.contains(path)
        }
    }

    fn no_dirs() -> FakeProbe {
        FakeProbe { dirs: vec![] }
    }

    #[test]
    fn applies_to_exact_match() {
        let rule = SyncRule::new("src".into(), "dst".into());
        let matcher = PathMatcher::new();
        assert!(matcher.applies_to(&rule, &"src".into()));
    }

    #[test]
    fn applies_to_descendant() {
        let rule = SyncRule::new("src".into(), "dst".into());
        let matcher = PathMatcher::new();
        assert!(matcher.applies_to(&rule, &"src/a.js".into()));
    }

    #[test]
    fn does_not_apply_to_sibling() {
        let rule = SyncRule::new("src".into(), "dst".into());
        let matcher = PathMatcher::new();
        assert!(!matcher.applies_to(&rule, &"srcfoo/a.js".into()));
    }

    #[test]
    fn except_excludes_direct_child() {
        let mut rule = SyncRule::new("src".into(), "dst".into());
        rule.except = vec!["ignored".to_string()];
        let matcher = PathMatcher::new();
        assert!(!matcher.applies_to(&rule, &"src/ignored".into()));
        assert!(!matcher.applies_to(&rule, &"src/ignored/nested.js".into()));
    }

    #[test]
    fn except_is_not_recursive_pattern() {
        // Only direct `rule.from / except[i]` prefixes count — a file
        // elsewhere named "ignored" is not excluded.
        let mut rule = SyncRule::new("src".into(), "dst".into());
        rule.except = vec!["ignored".to_string()];
        let matcher = PathMatcher::new();
        assert!(matcher.applies_to(&rule, &"src/nested/ignored".into()));
    }

    #[test]
    fn relative_never_matches_absolute_pattern() {
        let rule = SyncRule::new("/abs/src".into(), "/abs/dst".into());
        let matcher = PathMatcher::new();
        assert!(!matcher.applies_to(&rule, &"src/a.js".into()));
    }

    #[test]
    fn destination_for_descendant() {
        let rule = SyncRule::new("src".into(), "dst".into());
        let matcher = PathMatcher::new();
        let dest = matcher
            .destination(&rule, &"src/a.js".into(), &no_dirs())
            .unwrap();
        assert_eq!(dest.as_path(), std::path::Path::new("dst/a.js"));
    }

    #[test]
    fn destination_for_exact_match_non_directory() {
        let rule = SyncRule::new("pkg.json".into(), "pkg.json".into());
        let matcher = PathMatcher::new();
        let dest = matcher
            .destination(&rule, &"pkg.json".into(), &no_dirs())
            .unwrap();
        assert_eq!(dest.as_path(), std::path::Path::new("pkg.json"));
    }

    #[test]
    fn destination_for_exact_match_existing_directory() {
        let rule = SyncRule::new("src".into(), "dst".into());
        let matcher = PathMatcher::new();
        let probe = FakeProbe {
            dirs: vec!["dst".into()],
        };
        let dest = matcher.destination(&rule, &"src".into(), &probe).unwrap();
        assert_eq!(dest.as_path(), std::path::Path::new("dst/src"));
    }

    #[test]
    fn destination_none_when_not_applicable() {
        let rule = SyncRule::new("src".into(), "dst".into());
        let matcher = PathMatcher::new();
        assert!(matcher
            .destination(&rule, &"other".into(), &no_dirs())
            .is_none());
    }

    #[test]
    fn dot_is_legal_from_and_to() {
        let rule = SyncRule::new(".".into(), ".".into());
        let matcher = PathMatcher::new();
        assert!(matcher.applies_to(&rule, &"file1".into()));
    }
}
