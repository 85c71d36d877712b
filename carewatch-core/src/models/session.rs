use serde::{Deserialize, Serialize};

/// One active realtime connection owned by the session pool manager.
///
/// Carries the room-scoped credential and server URL the external realtime
/// library needs to keep the media connection alive. Removing the connection
/// from the pool is the whole teardown from this side: the transport
/// disconnects once the credential stops being provided to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConnection {
    /// Room key; matches a `RoomDescriptor` name.
    pub room_name: String,

    /// Opaque room- and identity-scoped access credential, time-limited.
    pub access_token: String,

    /// Realtime server the credential is valid for.
    pub server_url: String,

    pub connected: bool,
}

impl SessionConnection {
    pub fn new(
        room_name: impl Into<String>,
        access_token: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            room_name: room_name.into(),
            access_token: access_token.into(),
            server_url: server_url.into(),
            connected: true,
        }
    }
}
