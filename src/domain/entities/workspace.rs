//! Workspace / Service / Tunnel Entities (C10)
//!
//! A workspace lists services (each backed by Kubernetes manifests) and
//! tunnels.

use crate::error::{KeldaError, KeldaResult};
use serde::{Deserialize, Serialize};

/// Source of a service's Kubernetes manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestSource {
    /// Directory of YAML files, scanned recursively.
    Manifests(Vec<String>),
    /// Script whose stdout is the manifest YAML.
    Script(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(flatten)]
    pub source: ManifestSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tunnel {
    pub service_name: String,
    pub local_port: u16,
    pub remote_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workspace {
    pub version: String,
    pub services: Vec<Service>,
    #[serde(default)]
    pub tunnels: Vec<Tunnel>,
}

impl Workspace {
    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Validate every tunnel's `service_name` exists. `local_port`/`remote_port`
    /// are non-optional in the type system, so presence is structural; this
    /// only checks the service-name cross-reference.
    pub fn validate(&self) -> KeldaResult<()> {
        for tunnel in &self.tunnels {
            if self.find_service(&tunnel.service_name).is_none() {
                return Err(KeldaError::UnknownTunnelService {
                    service: tunnel.service_name.clone(),
                });
            }
        }
        Ok(())
    }
}
