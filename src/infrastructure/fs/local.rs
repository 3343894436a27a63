//! Local File System Implementation
//!
//! Implements the `FileSystem` port for local disk operations: used both
//! by the client syncer (reading the laptop working tree, expanding `~`
//! in config paths) and the dev-server (writing staged/synced files).

use crate::domain::ports::{FileSystem, FsError, FsResult};
use crate::domain::value_objects::{FileAttributes, ModTime};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;

/// Local file system implementation
///
/// Provides atomic writes, home directory expansion, and mode/mtime
/// control needed to reproduce a source file's attributes on the
/// destination side exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> FsResult<Vec<u8>> {
        let expanded = self.expand_home(path);
        std::fs::read(&expanded).map_err(Into::into)
    }

    fn write(&self, path: &Path, content: &[u8]) -> FsResult<()> {
        let expanded = self.expand_home(path);
        Self::atomic_write_internal(&expanded, content).map_err(FsError::Other)
    }

    fn exists(&self, path: &Path) -> bool {
        self.expand_home(path).exists()
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        let expanded = self.expand_home(path);
        std::fs::remove_file(&expanded).map_err(Into::into)
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        let expanded = self.expand_home(path);
        std::fs::create_dir_all(&expanded).map_err(Into::into)
    }

    #[cfg(unix)]
    fn set_mode(&self, path: &Path, mode: u32) -> FsResult<()> {
        use std::os::unix::fs::PermissionsExt;
        let expanded = self.expand_home(path);
        std::fs::set_permissions(&expanded, std::fs::Permissions::from_mode(mode))
            .map_err(Into::into)
    }

    #[cfg(not(unix))]
    fn set_mode(&self, _path: &Path, _mode: u32) -> FsResult<()> {
        Ok(())
    }

    fn set_mod_time(&self, path: &Path, mod_time: SystemTime) -> FsResult<()> {
        let expanded = self.expand_home(path);
        let file = std::fs::OpenOptions::new().write(true).open(&expanded)?;
        let times = filetime_for(mod_time);
        file.set_modified(times)?;
        Ok(())
    }

    fn fingerprint(&self, path: &Path) -> FsResult<FileAttributes> {
        let expanded = self.expand_home(path);
        let content = std::fs::read(&expanded)?;
        let metadata = std::fs::metadata(&expanded)?;
        let mode = file_mode(&metadata);
        let mod_time = ModTime::from_system_time(metadata.modified()?);
        Ok(FileAttributes::new(&content, mode, mod_time))
    }

    fn expand_home(&self, path: &Path) -> PathBuf {
        expand_home(path)
    }
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}

fn filetime_for(time: SystemTime) -> SystemTime {
    time
}

/// Expand a leading `~` to the user's home directory. Standalone so
/// callers outside `LocalFs` (e.g. config loaders resolving `from`/`to`
/// paths) can reuse it without constructing a `FileSystem`.
pub fn expand_home(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if path_str.starts_with("~/") || path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.join(path_str.strip_prefix("~/").unwrap_or(""));
        }
    }
    path.to_path_buf()
}

const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [100, 500, 1000];

impl LocalFs {
    /// Atomic write via tempfile + rename in the same directory (so the
    /// rename is same-filesystem and therefore atomic). Retries with
    /// backoff since a concurrent reader (e.g. a dev server restarting the
    /// child process) may transiently hold the destination open.
    fn atomic_write_internal(path: &Path, content: &[u8]) -> Result<(), String> {
        let dir = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| e.to_string())?;
        temp.write_all(content).map_err(|e| e.to_string())?;
        temp.flush().map_err(|e| e.to_string())?;

        for attempt in 0..=MAX_RETRIES {
            match temp.persist(path) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    if attempt < MAX_RETRIES {
                        thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                        temp = e.file;
                    } else {
                        return Err(e.error.to_string());
                    }
                }
            }
        }
        Ok(())
    }
}
