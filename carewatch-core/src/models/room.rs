use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::participant::ParticipantDescriptor;

/// One realtime call room as known to the room directory.
///
/// Descriptors are produced wholesale by the directory feed on every relevant
/// event; consumers never mutate them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDescriptor {
    /// Unique room key.
    pub name: String,

    #[serde(default)]
    pub metadata: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub participant_count: u32,

    #[serde(default)]
    pub publisher_count: u32,

    #[serde(default)]
    pub participants: Vec<ParticipantDescriptor>,
}

impl RoomDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: None,
            created_at: None,
            participant_count: 0,
            publisher_count: 0,
            participants: Vec::new(),
        }
    }

    pub fn with_participants(mut self, participants: Vec<ParticipantDescriptor>) -> Self {
        self.participant_count = participants.len() as u32;
        self.participants = participants;
        self
    }

    /// Number of participants classified as real visitors.
    pub fn visitor_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_visitor()).count()
    }

    /// True when the room has at least one real visitor and therefore
    /// qualifies for a monitoring session.
    pub fn has_visitors(&self) -> bool {
        self.participants.iter().any(|p| p.is_visitor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_with_only_staff_has_no_visitors() {
        let room = RoomDescriptor::new("room1").with_participants(vec![
            ParticipantDescriptor::new("admin_42", "Operator"),
            ParticipantDescriptor::new("agent-7", "Reminder Bot"),
        ]);
        assert!(!room.has_visitors());
        assert_eq!(room.visitor_count(), 0);
        assert_eq!(room.participant_count, 2);
    }

    #[test]
    fn test_room_with_mixed_participants_has_visitors() {
        let room = RoomDescriptor::new("room1").with_participants(vec![
            ParticipantDescriptor::new("admin_42", "Operator"),
            ParticipantDescriptor::new("user_99", "Edna"),
        ]);
        assert!(room.has_visitors());
        assert_eq!(room.visitor_count(), 1);
    }

    #[test]
    fn test_deserialize_snapshot_shape() {
        let raw = r#"{
            "name": "room1",
            "participantCount": 1,
            "publisherCount": 1,
            "participants": [{"identity": "user_1", "name": "Edna"}]
        }"#;
        let room: RoomDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(room.name, "room1");
        assert_eq!(room.participants.len(), 1);
        assert!(room.created_at.is_none());
    }
}
