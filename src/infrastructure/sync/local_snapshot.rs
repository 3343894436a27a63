//! Local snapshot (C3)
//!
//! Walks each sync rule's `from` under the service directory and records
//! one `SourceFile` per regular file it should track, keyed by the
//! normalized, rule-space path. Uses `ignore::WalkBuilder` rather than a
//! hand-rolled `read_dir` recursion, matching files against the general
//! sync-rule `applies_to` check instead of a fixed filter.

use crate::domain::entities::SourceFile;
use crate::domain::ports::{FileSystem, FsError};
use crate::domain::services::path_matcher::{DirectoryProbe, PathMatcher};
use crate::domain::value_objects::{NormalizedPath, SyncConfig};
use crate::error::{KeldaError, KeldaResult};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::Path;

/// Snapshot every `SyncRule::from` in `config`, resolving relative `from`
/// paths under `service_dir`. Symlinks and empty directories are never
/// recorded.
pub fn snapshot(
    config: &SyncConfig,
    service_dir: &Path,
    fs: &impl FileSystem,
) -> KeldaResult<BTreeMap<NormalizedPath, SourceFile>> {
    let matcher = PathMatcher::new();
    let mut files = BTreeMap::new();

    for rule in &config.rules {
        let resolved = resolve_from(rule.from.as_path(), service_dir, fs);

        if !resolved.exists() {
            return Err(KeldaError::SyncSourceNotFound {
                path: resolved,
                config_name: config.name.clone(),
            });
        }

        let metadata = std::fs::symlink_metadata(&resolved).map_err(KeldaError::Io)?;

        if metadata.is_file() {
            let attrs = fs.fingerprint(&resolved).map_err(fs_err_to_kelda)?;
            files.insert(
                rule.from.clone(),
                SourceFile::new(rule.from.clone(), resolved, attrs),
            );
            continue;
        }

        if !metadata.is_dir() {
            // A symlink at the rule root itself is never recorded.
            continue;
        }

        for entry in WalkBuilder::new(&resolved)
            .hidden(false)
            .git_ignore(false)
            .git_exclude(false)
            .standard_filters(false)
            .build()
        {
            let entry = entry.map_err(|e| KeldaError::Io(std::io::Error::other(e.to_string())))?;
            let file_type = match entry.file_type() {
                Some(ft) => ft,
                None => continue,
            };
            if !file_type.is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&resolved)
                .unwrap_or(entry.path());
            let normalized_path = rule.from.join(&*relative.to_string_lossy());

            if !matcher.applies_to(rule, &normalized_path) {
                continue;
            }

            let attrs = fs.fingerprint(entry.path()).map_err(fs_err_to_kelda)?;
            files.insert(
                normalized_path.clone(),
                SourceFile::new(normalized_path, entry.path().to_path_buf(), attrs),
            );
        }
    }

    Ok(files)
}

fn resolve_from(from: &Path, service_dir: &Path, fs: &impl FileSystem) -> std::path::PathBuf {
    let expanded = fs.expand_home(from);
    if expanded.is_absolute() {
        expanded
    } else {
        service_dir.join(expanded)
    }
}

fn fs_err_to_kelda(err: FsError) -> KeldaError {
    match err {
        FsError::Io(io) => KeldaError::Io(io),
        other => KeldaError::Io(std::io::Error::other(other.to_string())),
    }
}

/// Adapter so `PathMatcher::destination`'s directory probe works against
/// the real filesystem during snapshotting and diffing.
pub struct RealProbe;

impl DirectoryProbe for RealProbe {
    fn is_dir(&self, path: &NormalizedPath) -> bool {
        path.as_path().is_dir()
    }
}
