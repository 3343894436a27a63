//! Normalized Path Value Object
//!
//! A cleaned path used as the key space for sync rules. A
//! `NormalizedPath` may be absolute, relative, or home-relative — sync
//! rules are not sandboxed to one project root.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A path with `.`, `..`, and duplicate separators eliminated, keeping its
/// original absolute/relative-ness intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NormalizedPath(PathBuf);

impl NormalizedPath {
    /// Clean a path: resolve `.`/`..` components and duplicate separators,
    /// without touching the filesystem or expanding `~`.
    pub fn clean<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut out: Vec<Component> = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    match out.last() {
                        Some(Component::Normal(_)) => {
                            out.pop();
                        }
                        Some(Component::ParentDir) | None => out.push(component),
                        _ => out.push(component),
                    }
                }
                other => out.push(other),
            }
        }
        let mut buf = PathBuf::new();
        if out.is_empty() {
            buf.push(".");
        } else {
            for component in out {
                buf.push(component.as_os_str());
            }
        }
        Self(buf)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    pub fn is_absolute(&self) -> bool {
        self.0.is_absolute()
    }

    /// True iff `other` is this path or a descendant of it, comparing
    /// component-by-component (not a string prefix match).
    pub fn contains(&self, other: &NormalizedPath) -> bool {
        if self.is_absolute() != other.is_absolute() {
            return false;
        }
        let mut self_components = self.0.components();
        let mut other_components = other.0.components();
        loop {
            match self_components.next() {
                None => return true,
                Some(sc) => match other_components.next() {
                    Some(oc) if oc == sc => continue,
                    _ => return false,
                },
            }
        }
    }

    /// Path of `other` relative to `self`, or `None` if `other` does not
    /// descend from `self` (including the exact-equal case, which yields an
    /// empty relative path represented as `.`).
    pub fn strip_prefix(&self, other: &NormalizedPath) -> Option<PathBuf> {
        other.0.strip_prefix(&self.0).ok().map(|p| p.to_path_buf())
    }

    pub fn join<P: AsRef<Path>>(&self, rest: P) -> NormalizedPath {
        NormalizedPath::clean(self.0.join(rest))
    }

    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.0.file_name()
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(path: PathBuf) -> Self {
        NormalizedPath::clean(path)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        NormalizedPath::clean(s)
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
