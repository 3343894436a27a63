//! `kelda-dev-server` — the in-pod binary wiring C6/C8/C9 together.
//!
//! Flag-driven rather than a rich CLI, since it runs unattended inside a
//! container: pod name, service name, and spec version arrive via the
//! Kubernetes Downward API as environment variables; `--listen` and
//! `--staging-dir` are the only real flags.

use kelda::application::status_reconciler;
use kelda::application::ChildManager;
use kelda::domain::entities::DevStatus;
use kelda::domain::services::path_matcher::RealDirectoryProbe;
use kelda::domain::value_objects::Namespace;
use kelda::infrastructure::k8s::KubeMicroserviceStore;
use kelda::infrastructure::process::NixProcessRunner;
use kelda::infrastructure::rpc::proto::kelda_sync_server::KeldaSyncServer;
use kelda::infrastructure::rpc::{KeldaSyncService, ServerState};
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;

const MANAGE_POLL_INTERVAL: Duration = Duration::from_secs(30);

struct Args {
    listen: String,
    staging_dir: PathBuf,
}

fn parse_args() -> Args {
    let mut listen = "0.0.0.0:50051".to_string();
    let mut staging_dir = PathBuf::from("/tmp/kelda-stage");

    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--listen" => {
                if let Some(value) = args.next() {
                    listen = value;
                }
            }
            "--staging-dir" => {
                if let Some(value) = args.next() {
                    staging_dir = PathBuf::from(value);
                }
            }
            other => tracing::warn!(flag = other, "unrecognized flag, ignoring"),
        }
    }

    Args { listen, staging_dir }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = parse_args();
    let service_name = std::env::var("KELDA_SERVICE").unwrap_or_else(|_| "unknown".to_string());
    let pod_name = std::env::var("POD_NAME").unwrap_or_default();
    let namespace_raw = std::env::var("KELDA_NAMESPACE").unwrap_or_else(|_| "default".to_string());
    let namespace = Namespace::parse(&namespace_raw)?.to_string();
    let service_dir = std::env::var("KELDA_SERVICE_DIR").unwrap_or_else(|_| ".".to_string());
    let spec_version: u64 = std::env::var("KELDA_SPEC_VERSION")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let state = Arc::new(ServerState::new(args.staging_dir.clone()));
    let status = Arc::new(Mutex::new(DevStatus::empty(pod_name)));

    let (status_trigger_tx, status_trigger_rx) = mpsc::channel::<()>();

    spawn_child_manager(state.clone(), status.clone(), status_trigger_tx, PathBuf::from(service_dir));
    spawn_status_reconciler(status.clone(), service_name, namespace, spec_version, status_trigger_rx);

    let svc = KeldaSyncServer::new(KeldaSyncService::new(state))
        .send_compressed(CompressionEncoding::Gzip)
        .accept_compressed(CompressionEncoding::Gzip);

    tracing::info!(listen = %args.listen, "kelda-dev-server starting");
    Server::builder()
        .add_service(svc)
        .serve(args.listen.parse()?)
        .await?;

    Ok(())
}

/// Runs `manage_once` on its own thread: `ChildManager`/`ProcessRunner`
/// are blocking, not async.
fn spawn_child_manager(
    state: Arc<ServerState>,
    status: Arc<Mutex<DevStatus>>,
    status_trigger_tx: mpsc::Sender<()>,
    service_dir: PathBuf,
) {
    std::thread::spawn(move || {
        let mut manager = ChildManager::new(NixProcessRunner);
        let mut sync_complete_rx = state.sync_complete_tx.subscribe();
        let probe = RealDirectoryProbe;
        let synced = kelda::infrastructure::sync::SyncedTracker::new();

        loop {
            let changed = wait_for_sync_complete_or_timeout(&mut sync_complete_rx, MANAGE_POLL_INTERVAL);
            if !changed {
                tracing::debug!("child manager woke on 30s timer");
            }

            let Some(config) = state.sync_config.lock().expect("sync_config mutex poisoned").clone()
            else {
                continue;
            };
            let mirror = state.mirror_tracker.snapshot();

            if let Err(err) = manager.manage_once(&config, &service_dir, &synced, &mirror, &probe) {
                tracing::error!(error = %err, "manage_once failed");
            }

            let mut locked = status.lock().expect("status mutex poisoned");
            locked.running_version = manager.running_version().cloned();
            locked.target_version = state
                .target_version
                .lock()
                .expect("target_version mutex poisoned")
                .clone();
            drop(locked);

            let _ = status_trigger_tx.send(());
        }
    });
}

fn wait_for_sync_complete_or_timeout(
    rx: &mut tokio::sync::watch::Receiver<()>,
    timeout: Duration,
) -> bool {
    // `watch::Receiver::changed` is async; run it on a throwaway
    // single-threaded runtime since this function executes on a plain
    // OS thread.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("failed to build child-manager timer runtime");
    rt.block_on(async { tokio::time::timeout(timeout, rx.changed()).await.is_ok() })
}

fn spawn_status_reconciler(
    status: Arc<Mutex<DevStatus>>,
    service_name: String,
    namespace: String,
    spec_version: u64,
    trigger_rx: mpsc::Receiver<()>,
) {
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build status-reconciler runtime");

        let client = match rt.block_on(kube::Client::try_default()) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(error = %err, "failed to build kube client, status reconciler disabled");
                return;
            }
        };
        let store = KubeMicroserviceStore::new(client, &namespace);

        // `MicroserviceStore::get`/`compare_and_set_status` block on the
        // current tokio runtime internally, so this thread must keep one
        // entered for the lifetime of the loop.
        let _guard = rt.enter();
        status_reconciler::run(&store, &service_name, spec_version, &trigger_rx, || {
            status.lock().expect("status mutex poisoned").clone()
        });
    });
}
