//! `kelda` CLI surface (client binary)
//!
//! Thin `clap`-derived dispatch. CLI polish beyond driving C7/C10 is
//! explicitly out of scope.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kelda", about = "Per-developer Kubernetes dev namespaces")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the client syncer (C7) for one service until interrupted.
    Sync {
        /// Service name, matching a `kelda.yaml`'s `name` field.
        service: String,
        /// Path to the workspace file. Defaults to `kelda-workspace.yaml`.
        #[arg(long, default_value = "kelda-workspace.yaml")]
        workspace: PathBuf,
        /// Directory containing the service's `kelda.yaml`.
        #[arg(long, default_value = ".")]
        service_dir: PathBuf,
        /// Path to the user config file (namespace, kubeconfig context).
        #[arg(long, default_value = "kelda-user.yaml")]
        user_config: PathBuf,
    },
    /// Workspace file operations.
    Workspace {
        #[command(subcommand)]
        action: WorkspaceCommand,
    },
    /// Print the dev-server's reported status for a service.
    DevStatus {
        service: String,
        #[arg(long, default_value = "kelda-workspace.yaml")]
        workspace: PathBuf,
        /// Path to the user config file (namespace, kubeconfig context).
        #[arg(long, default_value = "kelda-user.yaml")]
        user_config: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum WorkspaceCommand {
    /// Validate a workspace file's structure and cross-references (C10).
    Validate {
        #[arg(default_value = "kelda-workspace.yaml")]
        path: PathBuf,
    },
}
