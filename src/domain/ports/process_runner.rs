//! ProcessRunner port (C8)
//!
//! Abstraction over starting and tearing down the dev-server's managed
//! child process (and its descendants, via process-group signaling).
//! Shaped like the other ports here: a small trait plus a crate-local
//! error enum.

/// Result type for process operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

#[derive(Debug)]
pub enum ProcessError {
    Spawn(std::io::Error),
    Signal(String),
    Wait(std::io::Error),
}

/// Outcome of a process that has already exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessError::Spawn(err) => write!(f, "failed to spawn process: {}", err),
            ProcessError::Signal(msg) => write!(f, "failed to signal process group: {}", msg),
            ProcessError::Wait(err) => write!(f, "failed to wait on process: {}", err),
        }
    }
}

impl std::error::Error for ProcessError {}

/// A managed child process group, grouped under its own pgid so a single
/// kill tears down the whole subtree.
pub trait ProcessRunner {
    type Handle;

    /// Spawn `command` (argv[0] + args) in `cwd`, in a new process group.
    fn spawn(&self, command: &[String], cwd: &std::path::Path) -> ProcessResult<Self::Handle>;

    /// Send SIGTERM to the process group, wait up to `grace` before SIGKILL.
    fn terminate(&self, handle: &mut Self::Handle, grace: std::time::Duration) -> ProcessResult<()>;

    /// Non-blocking check: `None` if still running, `Some(status)` once it
    /// has exited.
    fn has_exited(&self, handle: &mut Self::Handle) -> ProcessResult<Option<ExitStatus>>;
}
