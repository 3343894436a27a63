//! Error types for Kelda
//!
//! Uses `thiserror` for library errors, mirroring the layered wrapping
//! style used throughout domain/application/infrastructure.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Kelda operations
pub type KeldaResult<T> = Result<T, KeldaError>;

/// Main error type for Kelda operations
#[derive(Error, Debug)]
pub enum KeldaError {
    /// A sync rule's `from` path does not exist on disk
    #[error("file not found at sync source '{path}' (sync config: {config_name})")]
    SyncSourceNotFound { path: PathBuf, config_name: String },

    /// Configuration file failed strict parsing (unknown field, bad type, missing required field)
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Workspace file referenced a service name no sync config declares
    #[error("tunnel references unknown service '{service}'")]
    UnknownTunnelService { service: String },

    /// A sync config's `name` does not match any workspace service
    #[error("sync config name '{name}' does not match any workspace service")]
    UnknownSyncConfigService { name: String },

    /// Sync command absent and could not be derived from the workspace pod spec
    #[error("sync config '{name}' has no command and none could be derived from the workspace pod spec")]
    UndeterminedSyncCommand { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The dev-server rejected a file transfer because the post-transfer hash mismatched
    #[error("file changed during transfer: {path}")]
    FileChanged { path: String },

    /// Transport-level RPC failure (retryable by the next sync iteration)
    #[error("rpc transport failure: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Semantic RPC failure returned in a response body
    #[error("rpc error: {0}")]
    Rpc(#[from] tonic::Status),

    /// Microservice status update lost an optimistic-concurrency race repeatedly
    #[error("microservice status update conflict exhausted retries for {service}")]
    StatusConflictExhausted { service: String },

    /// Kubernetes API client error
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Child process could not be started or signalled
    #[error("child process error: {0}")]
    Process(String),

    /// A sync config's init_command exited non-zero
    #[error("init command for '{name}' failed (exit code {code:?})")]
    InitCommandFailed { name: String, code: Option<i32> },

    /// User configuration's `namespace` failed DNS-1123 label validation
    #[error("invalid namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: String },

    /// Generic wrapped error with added context, for layer boundaries
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<KeldaError>,
    },
}

impl KeldaError {
    /// Wrap this error with a short layer-boundary context string.
    pub fn context(self, context: impl Into<String>) -> Self {
        KeldaError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
