//! Conversions between the domain model and the generated protobuf types.

use super::proto;
use crate::domain::value_objects::{FileAttributes, ModTime, NormalizedPath, SyncConfig, SyncRule};

impl From<&FileAttributes> for proto::FileAttributes {
    fn from(attrs: &FileAttributes) -> Self {
        proto::FileAttributes {
            contents_hash: attrs.contents_hash.clone(),
            mode: attrs.mode,
            mod_time_unix_nanos: attrs.mod_time.as_unix_nanos() as i64,
        }
    }
}

impl From<proto::FileAttributes> for FileAttributes {
    fn from(attrs: proto::FileAttributes) -> Self {
        FileAttributes::from_parts(
            attrs.contents_hash,
            attrs.mode,
            ModTime::from_unix_nanos(attrs.mod_time_unix_nanos as i128),
        )
    }
}

impl From<&SyncRule> for proto::SyncRule {
    fn from(rule: &SyncRule) -> Self {
        proto::SyncRule {
            from: rule.from.to_string(),
            to: rule.to.to_string(),
            except: rule.except.clone(),
            trigger_init: rule.trigger_init,
        }
    }
}

impl From<proto::SyncRule> for SyncRule {
    fn from(rule: proto::SyncRule) -> Self {
        SyncRule {
            from: NormalizedPath::from(rule.from.as_str()),
            to: NormalizedPath::from(rule.to.as_str()),
            except: rule.except,
            trigger_init: rule.trigger_init,
        }
    }
}

impl From<&SyncConfig> for proto::SyncConfig {
    fn from(config: &SyncConfig) -> Self {
        proto::SyncConfig {
            name: config.name.clone(),
            rules: config.rules.iter().map(Into::into).collect(),
            sync_command: config.sync_command.clone(),
            init_command: config.init_command.clone(),
            image: config.image.clone(),
        }
    }
}

impl From<proto::SyncConfig> for SyncConfig {
    fn from(config: proto::SyncConfig) -> Self {
        SyncConfig {
            name: config.name,
            rules: config.rules.into_iter().map(Into::into).collect(),
            sync_command: config.sync_command,
            init_command: config.init_command,
            image: config.image,
        }
    }
}
