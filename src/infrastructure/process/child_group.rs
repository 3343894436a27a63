//! Managed child process group (C8)
//!
//! Every spawned command runs in its own process group (`setpgid`) so a
//! single signal tears down the whole subtree, built with `nix` for
//! POSIX process/signal control.

use crate::domain::ports::{ExitStatus, ProcessError, ProcessResult, ProcessRunner};
use nix::sys::signal::{self, Signal};
use nix::sys::wait::waitpid;
use nix::unistd::Pid;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ChildProcessGroupHandle {
    child: Child,
    pgid: Pid,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NixProcessRunner;

impl ProcessRunner for NixProcessRunner {
    type Handle = ChildProcessGroupHandle;

    fn spawn(&self, command: &[String], cwd: &Path) -> ProcessResult<Self::Handle> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| ProcessError::Spawn(std::io::Error::other("empty command")))?;

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);
        // Each command gets its own process group so a single SIGKILL to
        // -pgid reaches every descendant it spawns.
        unsafe {
            cmd.pre_exec(|| {
                nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                    .map_err(|e| std::io::Error::from_raw_os_error(e as i32))
            });
        }

        let child = cmd.spawn().map_err(ProcessError::Spawn)?;
        let pgid = Pid::from_raw(child.id() as i32);
        Ok(ChildProcessGroupHandle { child, pgid })
    }

    fn terminate(&self, handle: &mut Self::Handle, grace: Duration) -> ProcessResult<()> {
        send_signal(handle.pgid, Signal::SIGTERM)?;

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if self.has_exited(handle)?.is_some() {
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        // Restart-tolerant by spec: SIGKILL is acceptable if the grace
        // period elapses without a clean exit.
        send_signal(handle.pgid, Signal::SIGKILL)?;
        let _ = waitpid(handle.pgid, None);
        Ok(())
    }

    fn has_exited(&self, handle: &mut Self::Handle) -> ProcessResult<Option<ExitStatus>> {
        match handle.child.try_wait().map_err(ProcessError::Wait)? {
            Some(status) => Ok(Some(ExitStatus {
                success: status.success(),
                code: status.code(),
            })),
            None => Ok(None),
        }
    }
}

fn send_signal(pgid: Pid, signal: Signal) -> ProcessResult<()> {
    // Negative pid targets the whole process group.
    match signal::kill(Pid::from_raw(-pgid.as_raw()), signal) {
        Ok(()) => Ok(()),
        Err(nix::errno::Errno::ESRCH) => Ok(()), // "no such process" is benign
        Err(err) => Err(ProcessError::Signal(err.to_string())),
    }
}
