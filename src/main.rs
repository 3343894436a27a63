//! `kelda` CLI entry point
//!
//! Wires the client syncer (C7) and the workspace/status read paths into
//! runnable commands. CLI dispatch is intentionally thin.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, WorkspaceCommand};
use kelda::application::{sync_once, validate_workspace};
use kelda::domain::ports::MicroserviceStore;
use kelda::error::{KeldaError, KeldaResult};
use kelda::infrastructure::config::{pod_command, sync_config_file, user_config};
use kelda::infrastructure::fs::LocalFs;
use kelda::infrastructure::k8s::KubeMicroserviceStore;
use kelda::infrastructure::rpc::SyncClient;
use kelda::infrastructure::watch::{rule_roots, SyncWatcher, WakeReason};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync {
            service,
            workspace,
            service_dir,
            user_config,
        } => run_sync(&service, &workspace, &service_dir, &user_config).await,
        Commands::Workspace {
            action: WorkspaceCommand::Validate { path },
        } => validate_workspace(&path).map(|_| {
            println!("workspace is valid");
        }),
        Commands::DevStatus {
            service,
            workspace,
            user_config,
        } => dev_status(&service, &workspace, &user_config).await,
    };

    if let Err(err) = result {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

async fn run_sync(
    service_name: &str,
    workspace_path: &std::path::Path,
    service_dir: &std::path::Path,
    user_config_path: &std::path::Path,
) -> KeldaResult<()> {
    let workspace = validate_workspace(workspace_path)?;
    let service = workspace
        .find_service(service_name)
        .ok_or_else(|| KeldaError::UnknownSyncConfigService {
            name: service_name.to_string(),
        })?
        .clone();

    let sync_config = sync_config_file::load(&service_dir.join("kelda.yaml"), &workspace, || {
        pod_command::derive(&service, workspace_path.parent().unwrap_or(std::path::Path::new(".")))
    })?;

    let user = user_config::load(user_config_path)?;

    let kube_client = kube::Client::try_default()
        .await
        .map_err(KeldaError::Kube)?;
    let store = KubeMicroserviceStore::new(kube_client, user.namespace.as_str());

    let fs = LocalFs::new();
    let watcher = SyncWatcher::new(&rule_roots(&sync_config, service_dir, &fs), POLL_INTERVAL);

    let mut first_iteration = true;
    loop {
        let record = store.get(service_name).map_err(|e| KeldaError::Process(e.to_string()))?;
        if record.dev_status.pod.is_empty() {
            tracing::info!(service = service_name, "dev pod not yet assigned, skipping iteration");
        } else {
            let endpoint = format!("http://{}:50051", record.dev_status.pod);
            match SyncClient::connect(endpoint).await {
                Ok(mut client) => {
                    if let Err(err) =
                        sync_once(&sync_config, service_dir, &fs, &mut client, first_iteration).await
                    {
                        tracing::error!(service = service_name, error = %err, "sync iteration failed");
                    }
                    first_iteration = false;
                }
                Err(err) => tracing::warn!(service = service_name, error = %err, "could not connect to dev pod"),
            }
        }

        match watcher.wait() {
            WakeReason::FilesystemEvent => tracing::debug!("woke on filesystem event"),
            WakeReason::PollTimer => tracing::debug!("woke on poll timer"),
        }
    }
}

async fn dev_status(
    service: &str,
    workspace_path: &std::path::Path,
    user_config_path: &std::path::Path,
) -> KeldaResult<()> {
    let _ = validate_workspace(workspace_path)?;
    let user = user_config::load(user_config_path)?;
    let kube_client = kube::Client::try_default()
        .await
        .map_err(KeldaError::Kube)?;
    let store = KubeMicroserviceStore::new(kube_client, user.namespace.as_str());

    let record = store.get(service).map_err(|e| KeldaError::Process(e.to_string()))?;
    println!("service:          {}", service);
    println!("spec_version:     {}", record.spec_version);
    println!("pod:              {}", record.dev_status.pod);
    println!(
        "target_version:   {}",
        record
            .dev_status
            .target_version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "running_version:  {}",
        record
            .dev_status
            .running_version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}
