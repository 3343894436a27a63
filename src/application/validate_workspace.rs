//! Workspace validation use case
//!
//! Backs the `kelda workspace validate` subcommand: load the workspace
//! file and surface the first structural error found, without touching
//! the cluster.

use crate::domain::entities::Workspace;
use crate::error::KeldaResult;
use crate::infrastructure::config::workspace_file;
use std::path::Path;

pub fn validate_workspace(path: &Path) -> KeldaResult<Workspace> {
    workspace_file::load(path)
}
