use serde::{Deserialize, Serialize};

use crate::error::{CarewatchError, CarewatchResult};
use crate::models::{OperatorIdentity, RoomDescriptor};

/// Full room-directory snapshot: `GET {api}/v1/livekit/rooms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsSnapshot {
    #[serde(default)]
    pub livekit_url: String,

    #[serde(default)]
    pub total_rooms: u32,

    #[serde(default)]
    pub total_participants: u32,

    #[serde(default)]
    pub rooms: Vec<RoomDescriptor>,
}

/// Body for `POST {api}/v1/rtc/token`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RtcTokenRequest {
    pub room_name: String,
    pub role: String,
}

/// Raw wire shape of the token endpoint; fields are validated into
/// [`RtcTokenGrant`] so a missing credential is caught as a malformed
/// response instead of an empty string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RtcTokenResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub livekit_url: Option<String>,
}

/// A validated room-scoped host credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtcTokenGrant {
    pub token: String,
    pub livekit_url: String,
}

impl RtcTokenResponse {
    pub(crate) fn into_grant(self) -> CarewatchResult<RtcTokenGrant> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CarewatchError::MalformedResponse("token field missing".to_string()))?;
        let livekit_url = self.livekit_url.filter(|u| !u.is_empty()).ok_or_else(|| {
            CarewatchError::MalformedResponse("livekitUrl field missing".to_string())
        })?;
        Ok(RtcTokenGrant { token, livekit_url })
    }
}

/// One payload from the server push channel at `{api}/v1/events/stream`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub room_name: Option<String>,
}

impl StreamEvent {
    /// True for events that change room membership and therefore trigger a
    /// full snapshot re-fetch. Other application events are ignored.
    pub fn is_room_scoped(&self) -> bool {
        matches!(
            self.event_type.as_str(),
            "room-created" | "participant-joined" | "participant-left"
        )
    }
}

/// Response of `GET {api}/admin/me`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AdminMeResponse {
    pub admin: AdminProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AdminProfile {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl AdminMeResponse {
    pub(crate) fn into_identity(self) -> CarewatchResult<OperatorIdentity> {
        if self.admin.id.is_empty() {
            return Err(CarewatchError::MalformedResponse(
                "admin id missing".to_string(),
            ));
        }

        let display_name = self
            .admin
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| {
                self.admin
                    .email
                    .as_deref()
                    .map(|e| e.split('@').next().unwrap_or(e).to_string())
            })
            .unwrap_or_else(|| self.admin.id.clone());

        Ok(OperatorIdentity::new(self.admin.id, display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserializes_wire_shape() {
        let raw = r#"{
            "livekitUrl": "wss://rtc.example.com",
            "totalRooms": 1,
            "totalParticipants": 2,
            "rooms": [{"name": "room1", "participants": [{"identity": "user_1", "name": "Edna"}]}]
        }"#;
        let snapshot: RoomsSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.livekit_url, "wss://rtc.example.com");
        assert_eq!(snapshot.rooms.len(), 1);
        assert_eq!(snapshot.rooms[0].name, "room1");
    }

    #[test]
    fn test_token_response_missing_token_is_malformed() {
        let raw: RtcTokenResponse =
            serde_json::from_str(r#"{"livekitUrl": "wss://rtc.example.com"}"#).unwrap();
        let err = raw.into_grant().unwrap_err();
        assert!(matches!(err, CarewatchError::MalformedResponse(_)));
    }

    #[test]
    fn test_token_response_complete() {
        let raw: RtcTokenResponse =
            serde_json::from_str(r#"{"token": "jwt", "livekitUrl": "wss://rtc.example.com"}"#)
                .unwrap();
        let grant = raw.into_grant().unwrap();
        assert_eq!(grant.token, "jwt");
    }

    #[test]
    fn test_stream_event_room_scoped() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type": "participant-joined", "roomName": "room1"}"#).unwrap();
        assert!(event.is_room_scoped());
        assert_eq!(event.room_name.as_deref(), Some("room1"));

        let other: StreamEvent = serde_json::from_str(r#"{"type": "csv-import-done"}"#).unwrap();
        assert!(!other.is_room_scoped());
    }

    #[test]
    fn test_identity_display_name_falls_back_to_email_local_part() {
        let me: AdminMeResponse =
            serde_json::from_str(r#"{"admin": {"id": "42", "email": "pat@example.com"}}"#).unwrap();
        let identity = me.into_identity().unwrap();
        assert_eq!(identity.id, "42");
        assert_eq!(identity.display_name, "pat");
        assert_eq!(identity.identity(), "admin_42");
    }

    #[test]
    fn test_identity_missing_id_is_malformed() {
        let me: AdminMeResponse =
            serde_json::from_str(r#"{"admin": {"id": "", "name": "Pat"}}"#).unwrap();
        assert!(me.into_identity().is_err());
    }
}
