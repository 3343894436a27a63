//! FileAttributes & Version Value Objects (C2)
//!
//! A validated, immutable record of a file's observable state, and the
//! deterministic digest scheme used to compare two sides of the sync
//! pipeline without trusting clocks or filename ordering.

use sha2::{Digest, Sha512};
use std::fmt;
use std::time::SystemTime;

/// `(contents_hash, mode, mod_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileAttributes {
    /// Hex-encoded SHA-512 of the full file contents.
    pub contents_hash: String,
    /// POSIX file mode bits (e.g. 0o644).
    pub mode: u32,
    /// Modification time at nanosecond precision.
    pub mod_time: ModTime,
}

/// Nanosecond-precision modification time, comparable without a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModTime(i128);

impl ModTime {
    /// Construct from Unix nanoseconds (may be negative for pre-1970 mtimes).
    pub fn from_unix_nanos(nanos: i128) -> Self {
        Self(nanos)
    }

    /// Build from `std::time::SystemTime`, clamping to nanosecond precision.
    pub fn from_system_time(time: SystemTime) -> Self {
        let nanos = match time.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(dur) => dur.as_nanos() as i128,
            Err(err) => -(err.duration().as_nanos() as i128),
        };
        Self(nanos)
    }

    /// Unix nanoseconds.
    pub fn as_unix_nanos(&self) -> i128 {
        self.0
    }
}

impl FileAttributes {
    /// Compute attributes for file contents already read into memory, given
    /// the mode and modtime observed by the caller (kept separate from the
    /// hash so snapshot walkers can stat once and hash once).
    pub fn new(contents: &[u8], mode: u32, mod_time: ModTime) -> Self {
        Self {
            contents_hash: hex::encode(Sha512::digest(contents)),
            mode,
            mod_time,
        }
    }

    /// Reconstruct attributes already known to be correct (e.g. decoded off
    /// the wire, where the hash was computed by the sender).
    pub fn from_parts(contents_hash: String, mode: u32, mod_time: ModTime) -> Self {
        Self {
            contents_hash,
            mode,
            mod_time,
        }
    }

    /// Fixed textual encoding hashed to produce this attribute set's `Version`.
    ///
    /// `"ContentsHash: <hex>\nMode: <octal>\nModTime: <unix-nanos>\n"`
    pub fn canonical_text(&self) -> String {
        format!(
            "ContentsHash: {}\nMode: {:o}\nModTime: {}\n",
            self.contents_hash,
            self.mode,
            self.mod_time.as_unix_nanos()
        )
    }

    /// `Version()` — a digest of the canonical textual encoding.
    pub fn version(&self) -> Version {
        Version::of_bytes(self.canonical_text().as_bytes())
    }
}

/// A deterministic digest string identifying a snapshot, a sync config, or a
/// single file's attributes. Two `Version`s are equal iff the inputs that
/// produced them were byte-identical once sorted into canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Hash arbitrary canonical bytes into a version string.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha512::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(contents: &[u8], mode: u32, nanos: i128) -> FileAttributes {
        FileAttributes::new(contents, mode, ModTime::from_unix_nanos(nanos))
    }

    #[test]
    fn same_inputs_same_version() {
        let a = attrs(b"hello", 0o644, 1_000);
        let b = attrs(b"hello", 0o644, 1_000);
        assert_eq!(a.version(), b.version());
    }

    #[test]
    fn different_contents_different_version() {
        let a = attrs(b"hello", 0o644, 1_000);
        let b = attrs(b"world", 0o644, 1_000);
        assert_ne!(a.version(), b.version());
    }

    #[test]
    fn different_mode_different_version() {
        let a = attrs(b"hello", 0o644, 1_000);
        let b = attrs(b"hello", 0o755, 1_000);
        assert_ne!(a.version(), b.version());
    }

    #[test]
    fn different_modtime_different_version() {
        let a = attrs(b"hello", 0o644, 1_000);
        let b = attrs(b"hello", 0o644, 2_000);
        assert_ne!(a.version(), b.version());
    }

    #[test]
    fn canonical_text_is_fixed_format() {
        let a = attrs(b"x", 0o644, 42);
        let text = a.canonical_text();
        assert!(text.starts_with("ContentsHash: "));
        assert!(text.contains("\nMode: 644\n"));
        assert!(text.ends_with("ModTime: 42\n"));
    }

    #[test]
    fn modtime_handles_pre_epoch() {
        let before = SystemTime::UNIX_EPOCH - std::time::Duration::from_secs(10);
        let mt = ModTime::from_system_time(before);
        assert!(mt.as_unix_nanos() < 0);
    }

    #[test]
    fn contents_hash_is_sha512_hex() {
        let a = attrs(b"hello", 0o644, 0);
        assert_eq!(a.contents_hash.len(), 128);
    }
}
