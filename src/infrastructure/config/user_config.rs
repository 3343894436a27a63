//! User config file loader (C10)
//!
//! Loads the per-developer config (`version`, `namespace`, `context`,
//! `workspace`), rejecting unknown fields and validating `namespace`
//! against the DNS-1123 label rules.

use crate::domain::value_objects::Namespace;
use crate::error::{KeldaError, KeldaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUserConfig {
    version: String,
    namespace: String,
    context: String,
    workspace: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub version: String,
    pub namespace: Namespace,
    pub context: String,
    pub workspace: PathBuf,
}

pub fn load(path: &Path) -> KeldaResult<UserConfig> {
    let text = std::fs::read_to_string(path).map_err(KeldaError::Io)?;
    let raw: RawUserConfig =
        serde_yaml_ng::from_str(&text).map_err(|e| KeldaError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let namespace = Namespace::parse(&raw.namespace)?;

    Ok(UserConfig {
        version: raw.version,
        namespace,
        context: raw.context,
        workspace: raw.workspace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_valid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.yaml");
        std::fs::write(
            &path,
            r#"
version: "1"
namespace: dev-alice
context: minikube
workspace: workspace.yaml
"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.namespace.as_str(), "dev-alice");
        assert_eq!(config.context, "minikube");
    }

    #[test]
    fn rejects_reserved_namespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.yaml");
        std::fs::write(
            &path,
            r#"
version: "1"
namespace: kelda
context: minikube
workspace: workspace.yaml
"#,
        )
        .unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, KeldaError::InvalidNamespace { .. }));
    }

    #[test]
    fn rejects_unknown_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.yaml");
        std::fs::write(
            &path,
            r#"
version: "1"
namespace: dev-alice
context: minikube
workspace: workspace.yaml
extra: nope
"#,
        )
        .unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, KeldaError::InvalidConfig { .. }));
    }
}
