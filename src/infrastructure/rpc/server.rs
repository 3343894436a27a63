//! Dev-server gRPc surface (C6)
//!
//! Implements the four RPCs over the mirror tracker and the current sync
//! config. Follows a chunked bytestream upload pattern: the client
//! streams a header then N chunks; the server writes into a fresh
//! staging file, verifies the post-transfer hash, and only then
//! publishes into the mirror tracker.

use super::proto::kelda_sync_server::KeldaSync;
use super::proto::{
    self, GetMirrorSnapshotRequest, GetMirrorSnapshotResponse, MirrorRequest, MirrorResponse,
    RemoveRequest, RemoveResponse, SetTargetVersionRequest, SetTargetVersionResponse,
    SyncCompleteRequest, SyncCompleteResponse,
};
use crate::domain::entities::MirrorFile;
use crate::domain::value_objects::{FileAttributes, NormalizedPath, SyncConfig, Version};
use crate::infrastructure::sync::MirrorTracker;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio_stream::StreamExt;
use tonic::{Request, Response, Status, Streaming};
use uuid::Uuid;

/// Shared mutable state the RPC handlers and the child manager/status
/// reconciler all reach into. `sync_config`/`target_version` each sit
/// behind a single lock; RPC handlers take a short critical section to
/// replace it.
pub struct ServerState {
    pub sync_config: Mutex<Option<SyncConfig>>,
    pub target_version: Mutex<Option<Version>>,
    pub mirror_tracker: MirrorTracker,
    pub staging_dir: PathBuf,
    /// Coalesced notification to the child manager — queue depth one.
    pub sync_complete_tx: tokio::sync::watch::Sender<()>,
}

impl ServerState {
    pub fn new(staging_dir: PathBuf) -> Self {
        let (tx, _rx) = tokio::sync::watch::channel(());
        Self {
            sync_config: Mutex::new(None),
            target_version: Mutex::new(None),
            mirror_tracker: MirrorTracker::new(),
            staging_dir,
            sync_complete_tx: tx,
        }
    }
}

pub struct KeldaSyncService {
    state: std::sync::Arc<ServerState>,
}

impl KeldaSyncService {
    pub fn new(state: std::sync::Arc<ServerState>) -> Self {
        Self { state }
    }
}

#[tonic::async_trait]
impl KeldaSync for KeldaSyncService {
    async fn set_target_version(
        &self,
        request: Request<SetTargetVersionRequest>,
    ) -> Result<Response<SetTargetVersionResponse>, Status> {
        let req = request.into_inner();
        let Some(sync_config) = req.sync_config else {
            return Ok(Response::new(SetTargetVersionResponse {
                error: Some("missing sync_config".to_string()),
            }));
        };

        *self.state.sync_config.lock().expect("sync_config mutex poisoned") =
            Some(SyncConfig::from(sync_config));
        *self.state.target_version.lock().expect("target_version mutex poisoned") =
            Some(Version::from(req.version));

        Ok(Response::new(SetTargetVersionResponse { error: None }))
    }

    async fn get_mirror_snapshot(
        &self,
        _request: Request<GetMirrorSnapshotRequest>,
    ) -> Result<Response<GetMirrorSnapshotResponse>, Status> {
        let snapshot = self.state.mirror_tracker.snapshot();
        let files = snapshot
            .values()
            .map(|file| proto::MirrorFileEntry {
                sync_source_path: file.sync_source_path.to_string(),
                attributes: Some((&file.attributes).into()),
            })
            .collect();

        Ok(Response::new(GetMirrorSnapshotResponse { files, error: None }))
    }

    async fn mirror(
        &self,
        request: Request<Streaming<MirrorRequest>>,
    ) -> Result<Response<MirrorResponse>, Status> {
        let mut stream = request.into_inner();

        let header = match stream.next().await {
            Some(Ok(MirrorRequest {
                payload: Some(proto::mirror_request::Payload::Header(header)),
            })) => header,
            _ => return Err(Status::invalid_argument("expected header as first message")),
        };

        let attrs: FileAttributes = header
            .attributes
            .ok_or_else(|| Status::invalid_argument("missing attributes in header"))?
            .into();
        let sync_source_path = NormalizedPath::from(header.sync_source_path.as_str());

        let staging_path = self.state.staging_dir.join(Uuid::new_v4().to_string());
        std::fs::create_dir_all(&self.state.staging_dir)
            .map_err(|e| Status::internal(e.to_string()))?;

        let mut file =
            std::fs::File::create(&staging_path).map_err(|e| Status::internal(e.to_string()))?;

        use std::io::Write;
        while let Some(msg) = stream.next().await {
            let msg = msg?;
            if let Some(proto::mirror_request::Payload::Chunk(chunk)) = msg.payload {
                file.write_all(&chunk).map_err(|e| Status::internal(e.to_string()))?;
            }
        }
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&staging_path, std::fs::Permissions::from_mode(attrs.mode))
                .map_err(|e| Status::internal(e.to_string()))?;
        }

        // mtime is set last: no subsequent operation should overwrite it.
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(&staging_path)
            .map_err(|e| Status::internal(e.to_string()))?;
        let mod_time = std::time::UNIX_EPOCH
            + std::time::Duration::from_nanos(attrs.mod_time.as_unix_nanos().max(0) as u64);
        file.set_modified(mod_time).map_err(|e| Status::internal(e.to_string()))?;
        drop(file);

        let contents = std::fs::read(&staging_path).map_err(|e| Status::internal(e.to_string()))?;
        let rehashed = FileAttributes::new(&contents, attrs.mode, attrs.mod_time);

        if rehashed.contents_hash != attrs.contents_hash {
            let _ = std::fs::remove_file(&staging_path);
            return Ok(Response::new(MirrorResponse {
                error: Some("file changed during transfer".to_string()),
                file_changed: true,
            }));
        }

        self.state.mirror_tracker.mirrored(MirrorFile::new(
            sync_source_path,
            staging_path,
            attrs,
        ));

        Ok(Response::new(MirrorResponse {
            error: None,
            file_changed: false,
        }))
    }

    async fn remove(
        &self,
        request: Request<RemoveRequest>,
    ) -> Result<Response<RemoveResponse>, Status> {
        let req = request.into_inner();
        self.state
            .mirror_tracker
            .removed(&NormalizedPath::from(req.sync_source_path.as_str()));
        Ok(Response::new(RemoveResponse { error: None }))
    }

    async fn sync_complete(
        &self,
        _request: Request<SyncCompleteRequest>,
    ) -> Result<Response<SyncCompleteResponse>, Status> {
        // Best-effort nudge; correctness never depends on delivery (a 30s
        // fallback timer drives the same code).
        let _ = self.state.sync_complete_tx.send(());
        Ok(Response::new(SyncCompleteResponse { error: None }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_target_version_then_get_mirror_snapshot_is_empty() {
        let state = std::sync::Arc::new(ServerState::new(PathBuf::from("/tmp/kelda-test-stage")));
        let service = KeldaSyncService::new(state.clone());

        let config = proto::SyncConfig {
            name: "api".to_string(),
            rules: vec![],
            sync_command: vec![],
            init_command: vec![],
            image: None,
        };
        let response = service
            .set_target_version(Request::new(SetTargetVersionRequest {
                sync_config: Some(config),
                version: "abc".to_string(),
            }))
            .await
            .unwrap();
        assert!(response.into_inner().error.is_none());

        let snapshot = service
            .get_mirror_snapshot(Request::new(GetMirrorSnapshotRequest {}))
            .await
            .unwrap();
        assert!(snapshot.into_inner().files.is_empty());
    }

    #[tokio::test]
    async fn remove_on_empty_tracker_is_a_no_op() {
        let state = std::sync::Arc::new(ServerState::new(PathBuf::from("/tmp/kelda-test-stage-2")));
        let service = KeldaSyncService::new(state);

        let response = service
            .remove(Request::new(RemoveRequest {
                sync_source_path: "a.js".to_string(),
            }))
            .await
            .unwrap();
        assert!(response.into_inner().error.is_none());
    }
}
