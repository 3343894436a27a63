//! DestinationFile Entity (C5)
//!
//! `{ sync_destination_path, sync_source_path, attributes, rules }`.
//! `rules` is the non-empty list of sync rules that mapped this source
//! to this destination — multiple rules may share a destination
//! (notably to stack a `trigger_init` flag on a file otherwise covered
//! by a broader rule).

use crate::domain::value_objects::{FileAttributes, NormalizedPath, SyncRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFile {
    pub sync_destination_path: NormalizedPath,
    pub sync_source_path: NormalizedPath,
    pub attributes: FileAttributes,
    pub rules: Vec<SyncRule>,
}

impl DestinationFile {
    pub fn new(
        sync_destination_path: NormalizedPath,
        sync_source_path: NormalizedPath,
        attributes: FileAttributes,
        rule: SyncRule,
    ) -> Self {
        Self {
            sync_destination_path,
            sync_source_path,
            attributes,
            rules: vec![rule],
        }
    }

    /// Append another rule that also mapped to this same destination.
    pub fn add_rule(&mut self, rule: SyncRule) {
        self.rules.push(rule);
    }

    /// Sticky `needs_init` contribution: true if any contributing rule
    /// carries `trigger_init`.
    pub fn triggers_init(&self) -> bool {
        self.rules.iter().any(|r| r.trigger_init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FileAttributes, ModTime};

    fn attrs() -> FileAttributes {
        FileAttributes::new(b"x", 0o644, ModTime::from_unix_nanos(0))
    }

    #[test]
    fn triggers_init_if_any_rule_does() {
        let mut rule_a = SyncRule::new("src".into(), "dst".into());
        rule_a.trigger_init = false;
        let mut rule_b = SyncRule::new("pkg.json".into(), "dst/pkg.json".into());
        rule_b.trigger_init = true;

        let mut file = DestinationFile::new("dst/pkg.json".into(), "pkg.json".into(), attrs(), rule_a);
        assert!(!file.triggers_init());
        file.add_rule(rule_b);
        assert!(file.triggers_init());
    }
}
