//! Workspace file loader (C10)
//!
//! Strict YAML parsing: an unknown key is a hard error, not a warning,
//! via `serde(deny_unknown_fields)` — a misspelled service name here
//! would otherwise silently break sync for a whole team.

use crate::domain::entities::Workspace;
use crate::error::{KeldaError, KeldaResult};
use std::path::Path;

pub fn load(path: &Path) -> KeldaResult<Workspace> {
    let text = std::fs::read_to_string(path).map_err(KeldaError::Io)?;
    let workspace: Workspace =
        serde_yaml_ng::from_str(&text).map_err(|e| KeldaError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    workspace.validate()?;
    Ok(workspace)
}
