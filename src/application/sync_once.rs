//! Client syncer, one iteration (C7)
//!
//! Split into an outer function that reports start/complete/error events
//! and an inner function doing the actual work, so callers can hook
//! progress reporting without threading a callback through every step.

use crate::domain::ports::FileSystem;
use crate::domain::services::diff::diff_attribute_maps;
use crate::domain::services::fingerprint::Fingerprinter;
use crate::domain::value_objects::{FileAttributes, NormalizedPath, SyncConfig};
use crate::error::{KeldaError, KeldaResult};
use crate::infrastructure::rpc::SyncClient;
use crate::infrastructure::sync::local_snapshot;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::path::Path;

/// Bounded fan-out for parallel `Mirror` uploads.
pub const MIRROR_WORKER_COUNT: usize = 8;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncOnceReport {
    pub mirrored: usize,
    pub file_changed_retries: usize,
    pub removed: usize,
    pub already_synced: bool,
}

/// One `sync_once` iteration against a connected dev-server.
pub async fn sync_once(
    config: &SyncConfig,
    service_dir: &Path,
    fs: &impl FileSystem,
    client: &mut SyncClient,
    first_iteration: bool,
) -> KeldaResult<SyncOnceReport> {
    tracing::info!(config = %config.name, "sync starting");

    let result = perform_sync_once(config, service_dir, fs, client, first_iteration).await;

    match &result {
        Ok(report) => tracing::info!(
            config = %config.name,
            mirrored = report.mirrored,
            removed = report.removed,
            "sync complete"
        ),
        Err(err) => tracing::error!(config = %config.name, error = %err, "sync failed"),
    }

    result
}

async fn perform_sync_once(
    config: &SyncConfig,
    service_dir: &Path,
    fs: &impl FileSystem,
    client: &mut SyncClient,
    first_iteration: bool,
) -> KeldaResult<SyncOnceReport> {
    // Step 1: snapshot the source tree and compute the target version.
    let source_files = local_snapshot::snapshot(config, service_dir, fs)?;
    let attrs_by_path: BTreeMap<NormalizedPath, FileAttributes> = source_files
        .iter()
        .map(|(path, file)| (path.clone(), file.attributes.clone()))
        .collect();
    let target_version =
        Fingerprinter::new().snapshot_version(attrs_by_path.iter(), config);

    // Step 2.
    client.set_target_version(config, &target_version).await?;

    // Step 3.
    let mirror_snapshot = client.get_mirror_snapshot().await?;

    // Step 4.
    let diff = diff_attribute_maps(&attrs_by_path, &mirror_snapshot);

    if first_iteration && diff.is_empty() {
        tracing::info!(config = %config.name, "already synced");
        return Ok(SyncOnceReport {
            already_synced: true,
            ..Default::default()
        });
    }

    // Step 5: bounded-fan-out mirror uploads. Each worker gets its own
    // clone of `client` (cheap: shared tonic channel) so uploads actually
    // run concurrently instead of one at a time.
    let mut mirrored = 0usize;
    let mut file_changed_retries = 0usize;
    let source_files = &source_files;
    let outcomes: Vec<KeldaResult<Option<bool>>> = stream::iter(diff.to_apply.iter())
        .map(|path| {
            let mut client = client.clone();
            async move {
                let Some(file) = source_files.get(path) else {
                    return Ok(None);
                };
                let contents = fs
                    .read(&file.contents_path)
                    .map_err(|e| KeldaError::Io(std::io::Error::other(e.to_string())))?;

                let mirrored = client
                    .mirror_file(path, &file.attributes, &contents)
                    .await?;
                Ok(Some(mirrored))
            }
        })
        .buffer_unordered(MIRROR_WORKER_COUNT)
        .collect()
        .await;

    for outcome in outcomes {
        match outcome? {
            Some(true) => mirrored += 1,
            Some(false) => file_changed_retries += 1,
            None => {}
        }
    }

    // Step 6.
    for path in &diff.to_remove {
        client.remove(path).await?;
    }

    // Step 7.
    client.sync_complete().await?;

    Ok(SyncOnceReport {
        mirrored,
        file_changed_retries,
        removed: diff.to_remove.len(),
        already_synced: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_are_zero() {
        let report = SyncOnceReport::default();
        assert_eq!(report.mirrored, 0);
        assert!(!report.already_synced);
    }
}
