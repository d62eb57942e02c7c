use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered member of the exchange. The email is the identity and is
/// always stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

/// Input for a new registration, already normalized.
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub name: String,
    pub email: String,
}

/// One giver's drawn giftee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub giftee_email: String,
    pub assigned_at: DateTime<Utc>,
}

/// Giver email -> assignment. Replaced wholesale on every draw.
pub type AssignmentMap = BTreeMap<String, Assignment>;

/// Result of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub participant: String,
    pub email: String,
    pub success: bool,
    pub message: String,
}

impl NotificationOutcome {
    /// Placeholder entry reported when mail delivery isn't configured at all.
    pub fn unconfigured() -> Self {
        Self {
            participant: "System".into(),
            email: String::new(),
            success: false,
            message: "Email configuration not set".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_map_serializes_keyed_by_giver() {
        let at = DateTime::parse_from_rfc3339("2025-12-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut map = AssignmentMap::new();
        map.insert(
            "alice@example.com".into(),
            Assignment { giftee_email: "bob@example.com".into(), assigned_at: at },
        );

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["alice@example.com"]["giftee_email"], "bob@example.com");
        assert!(json["alice@example.com"]["assigned_at"].is_string());
    }
}
