//! SyncConfig Value Object (C2 rules-version, C10 file shape)
//!
//! `{ name, rules[], sync_command[], init_command[], image? }`.
//! `version(sync_config)` sorts rules and within-rule exceptions so
//! the version is invariant under YAML reordering.

use super::file_attributes::Version;
use super::sync_rule::SyncRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub name: String,
    pub rules: Vec<SyncRule>,
    #[serde(default)]
    pub sync_command: Vec<String>,
    #[serde(default)]
    pub init_command: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl SyncConfig {
    /// `version(sync_config)`: sort rules, sort exceptions within each rule,
    /// hash `(sync_command, init_command, rules)`.
    pub fn version(&self) -> Version {
        Version::of_bytes(self.canonical_text().as_bytes())
    }

    fn canonical_text(&self) -> String {
        let mut rules: Vec<&SyncRule> = self.rules.iter().collect();
        rules.sort_by_key(|r| r.sort_key());

        let mut text = String::new();
        text.push_str("SyncCommand:\n");
        for arg in &self.sync_command {
            text.push_str(&format!("  {}\n", arg));
        }
        text.push_str("InitCommand:\n");
        for arg in &self.init_command {
            text.push_str(&format!("  {}\n", arg));
        }
        text.push_str("Rules:\n");
        for rule in rules {
            text.push_str(&format!(
                "  From: {}\n  To: {}\n  TriggerInit: {}\n  Except:\n",
                rule.from, rule.to, rule.trigger_init
            ));
            for except in rule.sorted_except() {
                text.push_str(&format!("    {}\n", except));
            }
        }
        text
    }

    /// Find the rule set applicable — used by the dev-server to validate a
    /// `SetTargetVersion` call did not silently change the service identity.
    pub fn rules(&self) -> &[SyncRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(rules: Vec<SyncRule>) -> SyncConfig {
        SyncConfig {
            name: "api".to_string(),
            rules,
            sync_command: vec!["node".to_string(), "server.js".to_string()],
            init_command: vec![],
            image: None,
        }
    }

    #[test]
    fn version_invariant_under_rule_order() {
        let r1 = SyncRule::new("src".into(), "dst".into());
        let r2 = SyncRule::new("pkg.json".into(), "pkg.json".into());
        let a = config_with(vec![r1.clone(), r2.clone()]);
        let b = config_with(vec![r2, r1]);
        assert_eq!(a.version(), b.version());
    }

    #[test]
    fn version_invariant_under_exception_order() {
        let mut r1 = SyncRule::new("src".into(), "dst".into());
        r1.except = vec!["b".to_string(), "a".to_string()];
        let mut r2 = r1.clone();
        r2.except = vec!["a".to_string(), "b".to_string()];

        let a = config_with(vec![r1]);
        let b = config_with(vec![r2]);
        assert_eq!(a.version(), b.version());
    }

    #[test]
    fn version_changes_with_trigger_init() {
        let mut r1 = SyncRule::new("pkg.json".into(), "pkg.json".into());
        r1.trigger_init = false;
        let mut r2 = r1.clone();
        r2.trigger_init = true;

        let a = config_with(vec![r1]);
        let b = config_with(vec![r2]);
        assert_ne!(a.version(), b.version());
    }

    #[test]
    fn version_changes_with_sync_command() {
        let r = SyncRule::new("src".into(), "dst".into());
        let mut a = config_with(vec![r.clone()]);
        let mut b = config_with(vec![r]);
        a.sync_command = vec!["a".to_string()];
        b.sync_command = vec!["b".to_string()];
        assert_ne!(a.version(), b.version());
    }
}
