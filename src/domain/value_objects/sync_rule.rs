//! SyncRule Value Object
//!
//! `{ from, to, except[], trigger_init }`. Rules are
//! parsed client-side (where `~` expansion and service-directory
//! resolution happen) and then serialized verbatim into the RPC
//! `SetTargetVersion` call, so the dev-server operates on the same
//! resolved paths the client computed.

use super::normalized_path::NormalizedPath;
use serde::{Deserialize, Serialize};

/// Always-ignored exceptions appended to every rule by the config parser.
pub const IMPLICIT_EXCEPTIONS: &[&str] = &["kelda.log", "kelda.yaml", ".git", ".DS_Store"];

/// A single sync rule, with exceptions already including the implicit set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRule {
    pub from: NormalizedPath,
    pub to: NormalizedPath,
    #[serde(default)]
    pub except: Vec<String>,
    #[serde(default)]
    pub trigger_init: bool,
}

impl SyncRule {
    pub fn new(from: NormalizedPath, to: NormalizedPath) -> Self {
        Self {
            from,
            to,
            except: Vec::new(),
            trigger_init: false,
        }
    }

    /// Append the parser's implicit always-ignored set, deduplicating.
    pub fn with_implicit_exceptions(mut self) -> Self {
        for implicit in IMPLICIT_EXCEPTIONS {
            if !self.except.iter().any(|e| e == implicit) {
                self.except.push((*implicit).to_string());
            }
        }
        self
    }

    /// Sorted exception list, used when computing the rules-version so that
    /// reordering `except` entries in YAML does not change the version.
    pub fn sorted_except(&self) -> Vec<&str> {
        let mut sorted: Vec<&str> = self.except.iter().map(|s| s.as_str()).collect();
        sorted.sort_unstable();
        sorted
    }

    /// Canonical comparison key for sorting a rule list deterministically.
    pub fn sort_key(&self) -> (String, String) {
        (self.from.to_string(), self.to.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_exceptions_appended() {
        let rule = SyncRule::new("src".into(), "dst".into()).with_implicit_exceptions();
        for implicit in IMPLICIT_EXCEPTIONS {
            assert!(rule.except.iter().any(|e| e == implicit));
        }
    }

    #[test]
    fn implicit_exceptions_not_duplicated() {
        let mut rule = SyncRule::new("src".into(), "dst".into());
        rule.except.push(".git".to_string());
        let rule = rule.with_implicit_exceptions();
        assert_eq!(rule.except.iter().filter(|e| *e == ".git").count(), 1);
    }

    #[test]
    fn sorted_except_is_order_independent() {
        let mut a = SyncRule::new("src".into(), "dst".into());
        a.except = vec!["b".to_string(), "a".to_string()];
        let mut b = SyncRule::new("src".into(), "dst".into());
        b.except = vec!["a".to_string(), "b".to_string()];
        assert_eq!(a.sorted_except(), b.sorted_except());
    }
}
