//! Client-side RPC wrapper (C7)
//!
//! Thin wrapper over the generated tonic client with gzip compression
//! enabled on both directions. `Mirror` streams a header message
//! followed by fixed-size chunks, bytestream-upload style.

use super::proto::kelda_sync_client::KeldaSyncClient;
use super::proto::{
    self, GetMirrorSnapshotRequest, MirrorHeader, MirrorRequest, RemoveRequest,
    SetTargetVersionRequest, SyncCompleteRequest,
};
use crate::domain::value_objects::{FileAttributes, NormalizedPath, SyncConfig, Version};
use crate::error::{KeldaError, KeldaResult};
use std::collections::BTreeMap;
use tonic::codec::CompressionEncoding;
use tonic::transport::Channel;

/// Chunk size for `Mirror` uploads — source default is 1 KiB, any
/// power-of-two is acceptable.
pub const MIRROR_CHUNK_SIZE: usize = 1024;

/// Cheap to clone: the underlying tonic client shares one connection.
#[derive(Clone)]
pub struct SyncClient {
    inner: KeldaSyncClient<Channel>,
}

impl SyncClient {
    pub async fn connect(endpoint: String) -> KeldaResult<Self> {
        let channel = Channel::from_shared(endpoint)
            .map_err(|e| KeldaError::Process(e.to_string()))?
            .connect()
            .await?;

        let inner = KeldaSyncClient::new(channel)
            .send_compressed(CompressionEncoding::Gzip)
            .accept_compressed(CompressionEncoding::Gzip);

        Ok(Self { inner })
    }

    pub async fn set_target_version(
        &mut self,
        config: &SyncConfig,
        version: &Version,
    ) -> KeldaResult<()> {
        let response = self
            .inner
            .set_target_version(SetTargetVersionRequest {
                sync_config: Some(config.into()),
                version: version.as_str().to_string(),
            })
            .await?
            .into_inner();

        match response.error {
            Some(message) => Err(KeldaError::Process(message)),
            None => Ok(()),
        }
    }

    pub async fn get_mirror_snapshot(
        &mut self,
    ) -> KeldaResult<BTreeMap<NormalizedPath, FileAttributes>> {
        let response = self
            .inner
            .get_mirror_snapshot(GetMirrorSnapshotRequest {})
            .await?
            .into_inner();

        if let Some(message) = response.error {
            return Err(KeldaError::Process(message));
        }

        Ok(response
            .files
            .into_iter()
            .filter_map(|entry| {
                let attrs = entry.attributes?.into();
                Some((NormalizedPath::from(entry.sync_source_path.as_str()), attrs))
            })
            .collect())
    }

    /// Stream one file's header + chunks. Returns `Ok(false)` on a
    /// `FileChanged` response (silently retryable next iteration),
    /// `Err` on any other failure.
    pub async fn mirror_file(
        &mut self,
        sync_source_path: &NormalizedPath,
        attributes: &FileAttributes,
        contents: &[u8],
    ) -> KeldaResult<bool> {
        let header = MirrorRequest {
            payload: Some(proto::mirror_request::Payload::Header(MirrorHeader {
                sync_source_path: sync_source_path.to_string(),
                attributes: Some(attributes.into()),
            })),
        };

        let chunks: Vec<MirrorRequest> = contents
            .chunks(MIRROR_CHUNK_SIZE)
            .map(|chunk| MirrorRequest {
                payload: Some(proto::mirror_request::Payload::Chunk(chunk.to_vec())),
            })
            .collect();

        let messages = std::iter::once(header).chain(chunks);
        let response = self
            .inner
            .mirror(tokio_stream::iter(messages))
            .await?
            .into_inner();

        if response.file_changed {
            return Ok(false);
        }
        match response.error {
            Some(message) => Err(KeldaError::Process(message)),
            None => Ok(true),
        }
    }

    pub async fn remove(&mut self, sync_source_path: &NormalizedPath) -> KeldaResult<()> {
        let response = self
            .inner
            .remove(RemoveRequest {
                sync_source_path: sync_source_path.to_string(),
            })
            .await?
            .into_inner();

        match response.error {
            Some(message) => Err(KeldaError::Process(message)),
            None => Ok(()),
        }
    }

    pub async fn sync_complete(&mut self) -> KeldaResult<()> {
        let response = self
            .inner
            .sync_complete(SyncCompleteRequest {})
            .await?
            .into_inner();

        match response.error {
            Some(message) => Err(KeldaError::Process(message)),
            None => Ok(()),
        }
    }
}
