//! Pod command derivation from workspace manifests (C10)
//!
//! Scans a service's manifest files for a container list and returns the
//! container count plus an explicit `command` array, so
//! `sync_config_file::load` can derive `sync_command` when `kelda.yaml`
//! omits it. Deliberately a loose YAML walk rather than a typed
//! `k8s-openapi` deserialization: CRD/manifest provisioning is out of
//! scope, and this only needs to read what is already there.

use super::PodCommand;
use crate::domain::entities::{ManifestSource, Service};
use crate::error::{KeldaError, KeldaResult};
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::path::Path;

/// Read every manifest under `service.source` (directories only — a
/// script-sourced service has no static YAML to scan, so is treated as
/// zero containers found) and return the first pod-template container
/// list encountered.
pub fn derive(service: &Service, service_dir: &Path) -> KeldaResult<PodCommand> {
    let ManifestSource::Manifests(paths) = &service.source else {
        return Ok(PodCommand {
            containers: 0,
            command: None,
        });
    };

    for rel in paths {
        let path = service_dir.join(rel);
        for doc in read_yaml_documents(&path)? {
            if let Some(containers) = find_containers(&doc) {
                return Ok(summarize(containers));
            }
        }
    }

    Ok(PodCommand {
        containers: 0,
        command: None,
    })
}

fn read_yaml_documents(path: &Path) -> KeldaResult<Vec<Value>> {
    if path.is_dir() {
        let mut docs = Vec::new();
        for entry in std::fs::read_dir(path).map_err(KeldaError::Io)? {
            let entry = entry.map_err(KeldaError::Io)?;
            if entry.path().extension().and_then(|e| e.to_str()) == Some("yaml")
                || entry.path().extension().and_then(|e| e.to_str()) == Some("yml")
            {
                docs.extend(read_yaml_documents(&entry.path())?);
            }
        }
        return Ok(docs);
    }

    let text = std::fs::read_to_string(path).map_err(KeldaError::Io)?;
    Ok(serde_yaml_ng::Deserializer::from_str(&text)
        .filter_map(|d| Value::deserialize(d).ok())
        .collect())
}

/// Walk `spec.template.spec.containers` (Deployment/StatefulSet shape) or
/// `spec.containers` (bare Pod shape).
fn find_containers(doc: &Value) -> Option<&Vec<Value>> {
    let spec = doc.get("spec")?;
    if let Some(containers) = spec
        .get("template")
        .and_then(|t| t.get("spec"))
        .and_then(|s| s.get("containers"))
        .and_then(|c| c.as_sequence())
    {
        return Some(containers);
    }
    spec.get("containers").and_then(|c| c.as_sequence())
}

fn summarize(containers: &[Value]) -> PodCommand {
    let command = containers.first().and_then(|c| {
        c.get("command")?.as_sequence().map(|seq| {
            seq.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
    });

    PodCommand {
        containers: containers.len(),
        command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn derives_command_from_deployment_manifest() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("k8s")).unwrap();
        std::fs::write(
            dir.path().join("k8s/api.yaml"),
            r#"
apiVersion: apps/v1
kind: Deployment
spec:
  template:
    spec:
      containers:
        - name: api
          command: ["node", "server.js"]
"#,
        )
        .unwrap();

        let service = Service {
            name: "api".to_string(),
            source: ManifestSource::Manifests(vec!["k8s".to_string()]),
        };

        let pod_command = derive(&service, dir.path()).unwrap();
        assert_eq!(pod_command.containers, 1);
        assert_eq!(
            pod_command.command,
            Some(vec!["node".to_string(), "server.js".to_string()])
        );
    }

    #[test]
    fn script_sourced_service_has_no_containers() {
        let dir = tempdir().unwrap();
        let service = Service {
            name: "api".to_string(),
            source: ManifestSource::Script(vec!["generate.sh".to_string()]),
        };
        let pod_command = derive(&service, dir.path()).unwrap();
        assert_eq!(pod_command.containers, 0);
    }
}
