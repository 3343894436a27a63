//! Laptop filesystem watcher (C7 trigger source)
//!
//! A `notify` watcher feeding a debounced channel, matching changes
//! against "any change under any sync rule's `from`" rather than a
//! fixed filter, and raising the open-file budget this needs on macOS.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Reason the watcher produced a wakeup, for the caller's logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    FilesystemEvent,
    PollTimer,
}

/// Watches `roots` recursively and yields a wakeup on any change, or every
/// `poll_interval` regardless (the safety net, and the sole mechanism when
/// inotify/kqueue watches are unavailable).
pub struct SyncWatcher {
    _watcher: Option<RecommendedWatcher>,
    rx: Option<Receiver<()>>,
    poll_interval: Duration,
}

impl SyncWatcher {
    /// Attempt to watch `roots`. On "too many open files" or any other
    /// watch-registration failure, falls back to polling-only mode with a
    /// warning.
    pub fn new(roots: &[PathBuf], poll_interval: Duration) -> Self {
        raise_open_file_limit();

        let (tx, rx) = channel();
        let mut watcher = match RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if res.is_ok() {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        ) {
            Ok(watcher) => watcher,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create filesystem watcher, falling back to polling");
                return Self {
                    _watcher: None,
                    rx: None,
                    poll_interval,
                };
            }
        };

        let mut any_watched = false;
        for root in roots {
            if !root.exists() {
                continue;
            }
            match watcher.watch(root, RecursiveMode::Recursive) {
                Ok(()) => any_watched = true,
                Err(err) => {
                    tracing::warn!(
                        path = %root.display(),
                        error = %err,
                        "failed to watch path, falling back to polling for it"
                    );
                }
            }
        }

        if !any_watched {
            return Self {
                _watcher: None,
                rx: None,
                poll_interval,
            };
        }

        Self {
            _watcher: Some(watcher),
            rx: Some(rx),
            poll_interval,
        }
    }

    /// Block until either a filesystem event arrives or the poll interval
    /// elapses, whichever first.
    pub fn wait(&self) -> WakeReason {
        match &self.rx {
            Some(rx) => match rx.recv_timeout(self.poll_interval) {
                Ok(()) => {
                    // Drain any additional queued events so a burst of
                    // writes collapses into one wakeup.
                    while rx.try_recv().is_ok() {}
                    WakeReason::FilesystemEvent
                }
                Err(_) => WakeReason::PollTimer,
            },
            None => {
                std::thread::sleep(self.poll_interval);
                WakeReason::PollTimer
            }
        }
    }
}

/// Raise the soft open-file limit to the hard limit, capped at 10240
/// . A no-op failure is logged, not fatal — the watcher will
/// simply fall back to polling if it later hits the ceiling.
#[cfg(unix)]
fn raise_open_file_limit() {
    use nix::sys::resource::{getrlimit, setrlimit, Resource};

    const MAX_SOFT_LIMIT: u64 = 10_240;

    match getrlimit(Resource::RLIMIT_NOFILE) {
        Ok((soft, hard)) => {
            let target = hard.min(MAX_SOFT_LIMIT);
            if target > soft {
                if let Err(err) = setrlimit(Resource::RLIMIT_NOFILE, target, hard) {
                    tracing::warn!(error = %err, "failed to raise open-file limit");
                }
            }
        }
        Err(err) => tracing::warn!(error = %err, "failed to read open-file limit"),
    }
}

#[cfg(not(unix))]
fn raise_open_file_limit() {}

/// Collect every rule's resolved `from` root, for watcher registration.
pub fn rule_roots(
    config: &crate::domain::value_objects::SyncConfig,
    service_dir: &Path,
    fs: &impl crate::domain::ports::FileSystem,
) -> Vec<PathBuf> {
    config
        .rules()
        .iter()
        .map(|rule| {
            let expanded = fs.expand_home(rule.from.as_path());
            if expanded.is_absolute() {
                expanded
            } else {
                service_dir.join(expanded)
            }
        })
        .collect()
}
