//! FileSystem port - abstraction over file I/O operations
//!
//! Covers fingerprinting (C2) and `~` expansion alongside basic file
//! I/O, since both the local snapshot walker (C3) and the dev-server's
//! staging writer (C8) need the same primitives.

use crate::domain::value_objects::FileAttributes;
use std::path::{Path, PathBuf};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error
    Io(std::io::Error),
    /// Other error
    Other(String),
}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(PathBuf::new()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(PathBuf::new()),
            _ => FsError::Io(err),
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::Io(err) => write!(f, "I/O error: {}", err),
            FsError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FsError {}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O (client laptop and dev-server staging)
/// - `MockFs` - in-memory for testing
pub trait FileSystem {
    /// Read file content as bytes.
    fn read(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// Write content to file atomically, creating parent directories.
    fn write(&self, path: &Path, content: &[u8]) -> FsResult<()>;

    /// Check if file exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file. A not-found error is the caller's concern to treat as
    /// benign where appropriate (e.g. manage_once's to_remove).
    fn remove(&self, path: &Path) -> FsResult<()>;

    /// Create directory and parents (mode 0755).
    fn create_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Set a file's mode bits (POSIX).
    fn set_mode(&self, path: &Path, mode: u32) -> FsResult<()>;

    /// Set a file's modification time (done last in every write path so no
    /// subsequent operation clobbers it).
    fn set_mod_time(&self, path: &Path, mod_time: std::time::SystemTime) -> FsResult<()>;

    /// Fingerprint a file's current on-disk state (C2).
    fn fingerprint(&self, path: &Path) -> FsResult<FileAttributes>;

    /// Expand `~` to the home directory (client-side only).
    fn expand_home(&self, path: &Path) -> PathBuf;
}
