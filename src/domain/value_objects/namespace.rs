//! Namespace Value Object (C10 user configuration)
//!
//! A validated Kubernetes namespace name: must satisfy the DNS-1123
//! label rules (lowercase alphanumerics and hyphens, no leading or
//! trailing hyphen, at most 63 characters) and must not equal the
//! reserved string `kelda`, which is carved out for the system's own
//! control-plane namespace.

use crate::error::KeldaError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_LEN: usize = 63;
const RESERVED: &str = "kelda";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    pub fn parse(raw: &str) -> Result<Self, KeldaError> {
        let reason = if raw.is_empty() {
            Some("must not be empty".to_string())
        } else if raw.len() > MAX_LEN {
            Some(format!("must be at most {} characters", MAX_LEN))
        } else if raw == RESERVED {
            Some(format!("'{}' is reserved", RESERVED))
        } else if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            Some("must contain only lowercase alphanumerics and hyphens".to_string())
        } else if raw.starts_with('-') || raw.ends_with('-') {
            Some("must not start or end with a hyphen".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(KeldaError::InvalidNamespace {
                namespace: raw.to_string(),
                reason,
            }),
            None => Ok(Namespace(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = KeldaError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Namespace::parse(&raw)
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_label() {
        assert!(Namespace::parse("dev-alice").is_ok());
    }

    #[test]
    fn rejects_reserved_name() {
        let err = Namespace::parse("kelda").unwrap_err();
        assert!(matches!(err, KeldaError::InvalidNamespace { .. }));
    }

    #[test]
    fn rejects_uppercase() {
        assert!(Namespace::parse("Dev-Alice").is_err());
    }

    #[test]
    fn rejects_leading_hyphen() {
        assert!(Namespace::parse("-alice").is_err());
    }

    #[test]
    fn rejects_trailing_hyphen() {
        assert!(Namespace::parse("alice-").is_err());
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(64);
        assert!(Namespace::parse(&long).is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(Namespace::parse("").is_err());
    }
}
