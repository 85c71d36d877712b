use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity prefix marking console operators (e.g. `admin_42`).
pub const OPERATOR_IDENTITY_PREFIX: &str = "admin_";

/// Identity prefix marking automated participants (e.g. `agent-7`).
pub const AUTOMATED_IDENTITY_PREFIX: &str = "agent-";

/// Classification of a participant identity.
///
/// Identities are an untyped string convention: operators and automated
/// participants are distinguished from real visitors by prefix alone. The
/// convention lives here and nowhere else; the session pool and roster both
/// route through [`classify_identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityClass {
    Operator,
    Automated,
    Visitor,
}

/// Classify a participant identity by its prefix.
pub fn classify_identity(identity: &str) -> IdentityClass {
    if identity.starts_with(OPERATOR_IDENTITY_PREFIX) {
        IdentityClass::Operator
    } else if identity.starts_with(AUTOMATED_IDENTITY_PREFIX) {
        IdentityClass::Automated
    } else {
        IdentityClass::Visitor
    }
}

/// One participant of a call room as reported by the room directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDescriptor {
    pub identity: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub metadata: Option<String>,

    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

impl ParticipantDescriptor {
    pub fn new(identity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            name: name.into(),
            metadata: None,
            joined_at: None,
        }
    }

    pub fn class(&self) -> IdentityClass {
        classify_identity(&self.identity)
    }

    /// True when this participant is a real end-user visitor rather than an
    /// operator or automated participant.
    pub fn is_visitor(&self) -> bool {
        self.class() == IdentityClass::Visitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_identity() {
        assert_eq!(classify_identity("admin_42"), IdentityClass::Operator);
        assert_eq!(classify_identity("agent-7"), IdentityClass::Automated);
        assert_eq!(classify_identity("user_99"), IdentityClass::Visitor);
        assert_eq!(classify_identity(""), IdentityClass::Visitor);
    }

    #[test]
    fn test_prefix_must_match_exactly() {
        assert_eq!(classify_identity("admin-42"), IdentityClass::Visitor);
        assert_eq!(classify_identity("agent_7"), IdentityClass::Visitor);
        assert_eq!(classify_identity("Admin_42"), IdentityClass::Visitor);
    }

    #[test]
    fn test_is_visitor() {
        assert!(ParticipantDescriptor::new("user_1", "Edna").is_visitor());
        assert!(!ParticipantDescriptor::new("admin_5", "Operator").is_visitor());
        assert!(!ParticipantDescriptor::new("agent-1", "Reminder Bot").is_visitor());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let raw = r#"{"identity":"user_1","name":"Edna","joinedAt":"2025-06-01T10:00:00Z"}"#;
        let p: ParticipantDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(p.identity, "user_1");
        assert!(p.joined_at.is_some());
        assert!(p.metadata.is_none());
    }
}
