//! Child process manager, one iteration (C8)
//!
//! Owns `needs_init` (sticky across failed attempts), the running child
//! handle, and the synced tracker.

use crate::domain::entities::MirrorFile;
use crate::domain::ports::{ExitStatus, ProcessResult, ProcessRunner};
use crate::domain::services::path_matcher::DirectoryProbe;
use crate::domain::value_objects::{NormalizedPath, SyncConfig, Version};
use crate::error::{KeldaError, KeldaResult};
use crate::infrastructure::sync::SyncedTracker;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const TERMINATE_GRACE: Duration = Duration::from_secs(5);

pub struct ChildManager<R: ProcessRunner> {
    runner: R,
    needs_init: bool,
    running_handle: Option<R::Handle>,
    running_version: Option<Version>,
}

impl<R: ProcessRunner> ChildManager<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            needs_init: false,
            running_handle: None,
            running_version: None,
        }
    }

    pub fn running_version(&self) -> Option<&Version> {
        self.running_version.as_ref()
    }

    /// One `manage_once` pass. `service_dir` is where `init_command`/
    /// `sync_command` run (cwd of the synced destination tree).
    pub fn manage_once(
        &mut self,
        config: &SyncConfig,
        service_dir: &Path,
        synced: &SyncedTracker,
        mirror_snapshot: &BTreeMap<NormalizedPath, MirrorFile>,
        probe: &impl DirectoryProbe,
    ) -> KeldaResult<()> {
        let (diff, expected) = synced.diff(mirror_snapshot, config, probe);

        if !diff.is_empty() {
            self.kill_running_child()?;
        }

        for path in &diff.to_apply {
            let Some(destination_file) = expected.get(path) else {
                continue;
            };
            let Some(mirror_file) = mirror_snapshot.get(&destination_file.sync_source_path)
            else {
                continue;
            };

            let dest_path = service_dir.join(path.as_path());
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent).map_err(KeldaError::Io)?;
            }
            std::fs::copy(&mirror_file.contents_path, &dest_path).map_err(KeldaError::Io)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(
                    &dest_path,
                    std::fs::Permissions::from_mode(destination_file.attributes.mode),
                )
                .map_err(KeldaError::Io)?;
            }

            // mtime set last so no subsequent operation overwrites it.
            let file = std::fs::OpenOptions::new()
                .write(true)
                .open(&dest_path)
                .map_err(KeldaError::Io)?;
            let nanos = destination_file.attributes.mod_time.as_unix_nanos().max(0) as u64;
            let mod_time = std::time::UNIX_EPOCH + Duration::from_nanos(nanos);
            file.set_modified(mod_time).map_err(KeldaError::Io)?;

            synced.synced(destination_file.clone());
        }

        for path in &diff.to_remove {
            let dest_path = service_dir.join(path.as_path());
            match std::fs::remove_file(&dest_path) {
                Ok(()) | Err(_) => {} // not-found is benign 
            }
            synced.removed(path);
        }

        let new_version = synced.version(config);
        let files = synced.files();
        if Some(&new_version) == self.running_version.as_ref() || files.is_empty() {
            return Ok(());
        }

        if diff.to_apply.iter().any(|path| {
            expected
                .get(path)
                .map(|file| file.triggers_init())
                .unwrap_or(false)
        }) {
            self.needs_init = true;
        }

        if self.needs_init {
            self.run_init_command(config, service_dir)?;
            self.needs_init = false;
        }

        self.start_sync_command(config, service_dir)?;
        self.running_version = Some(new_version);

        Ok(())
    }

    fn kill_running_child(&mut self) -> KeldaResult<()> {
        if let Some(mut handle) = self.running_handle.take() {
            self.runner
                .terminate(&mut handle, TERMINATE_GRACE)
                .map_err(process_error)?;
        }
        Ok(())
    }

    fn run_init_command(&mut self, config: &SyncConfig, service_dir: &Path) -> KeldaResult<()> {
        if config.init_command.is_empty() {
            return Ok(());
        }
        let mut handle = self
            .runner
            .spawn(&config.init_command, service_dir)
            .map_err(process_error)?;

        // Run to completion synchronously: poll has_exited. On failure,
        // needs_init stays true so the next iteration retries and the sync
        // command is never started.
        loop {
            if let Some(status) = self
                .runner
                .has_exited(&mut handle)
                .map_err(process_error)?
            {
                if !status.success {
                    return Err(KeldaError::InitCommandFailed {
                        name: config.name.clone(),
                        code: status.code,
                    });
                }
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    fn start_sync_command(&mut self, config: &SyncConfig, service_dir: &Path) -> KeldaResult<()> {
        if config.sync_command.is_empty() {
            return Ok(());
        }
        let handle = self
            .runner
            .spawn(&config.sync_command, service_dir)
            .map_err(process_error)?;
        self.running_handle = Some(handle);
        Ok(())
    }
}

fn process_error(err: impl std::fmt::Display) -> KeldaError {
    KeldaError::Process(err.to_string())
}
