//! Sync config file loader (C10)
//!
//! Loads a service directory's sync configuration and validates it
//! references a real workspace service, deriving `sync_command` from the
//! workspace pod spec when absent.

use crate::domain::entities::Workspace;
use crate::domain::value_objects::SyncConfig;
use crate::error::{KeldaError, KeldaResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk shape before command derivation. Exceptions/trigger_init have
/// sensible defaults; `sync_command` is optional because it may be
/// derivable from the workspace pod spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSyncConfig {
    name: String,
    rules: Vec<RawSyncRule>,
    #[serde(default)]
    sync_command: Vec<String>,
    #[serde(default)]
    init_command: Vec<String>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSyncRule {
    from: String,
    to: String,
    #[serde(default)]
    except: Vec<String>,
    #[serde(default)]
    trigger_init: bool,
}

/// A single container's explicit `command` array, as read from a
/// workspace pod spec — used only to derive `sync_command` when the sync
/// config omits it.
pub struct PodCommand {
    pub containers: usize,
    pub command: Option<Vec<String>>,
}

pub fn load(
    path: &Path,
    workspace: &Workspace,
    pod_command: impl FnOnce() -> KeldaResult<PodCommand>,
) -> KeldaResult<SyncConfig> {
    let text = std::fs::read_to_string(path).map_err(KeldaError::Io)?;
    let raw: RawSyncConfig =
        serde_yaml_ng::from_str(&text).map_err(|e| KeldaError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if workspace.find_service(&raw.name).is_none() {
        return Err(KeldaError::UnknownSyncConfigService { name: raw.name });
    }

    let rules = raw
        .rules
        .into_iter()
        .map(|r| {
            let mut rule = crate::domain::value_objects::SyncRule::new(
                r.from.as_str().into(),
                r.to.as_str().into(),
            );
            rule.except = r.except;
            rule.trigger_init = r.trigger_init;
            rule.with_implicit_exceptions()
        })
        .collect();

    let sync_command = if raw.sync_command.is_empty() {
        derive_sync_command(&raw.name, pod_command)?
    } else {
        raw.sync_command
    };

    Ok(SyncConfig {
        name: raw.name,
        rules,
        sync_command,
        init_command: raw.init_command,
        image: raw.image,
    })
}

/// Only derivable when the pod spec has exactly one container with an
/// explicit `command` array (not `args`).
fn derive_sync_command(
    name: &str,
    pod_command: impl FnOnce() -> KeldaResult<PodCommand>,
) -> KeldaResult<Vec<String>> {
    let pod = pod_command()?;
    match (pod.containers, pod.command) {
        (1, Some(command)) if !command.is_empty() => Ok(command),
        _ => Err(KeldaError::UndeterminedSyncCommand {
            name: name.to_string(),
        }),
    }
}
