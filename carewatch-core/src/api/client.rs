use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::error::{CarewatchError, CarewatchResult};
use crate::models::OperatorIdentity;

use super::types::{AdminMeResponse, RoomsSnapshot, RtcTokenGrant, RtcTokenRequest, RtcTokenResponse};

/// Typed client for the admin API collaborators the orchestrator consumes.
///
/// Every call reads the bearer token from the injected [`TokenStore`]; a
/// missing token fails fast with `NotAuthenticated` and a 401/403 response
/// maps to `AuthRejected`, both of which callers treat as "stop and
/// re-login" rather than retry.
pub struct AdminApiClient {
    base_url: String,
    http: Client,
    // Separate client for the push subscription: a whole-request timeout
    // would cut the long-lived stream off mid-flight.
    stream_http: Client,
    store: Arc<dyn TokenStore>,
}

impl AdminApiClient {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self::with_timeout(base_url, store, Duration::from_secs(10))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        store: Arc<dyn TokenStore>,
        timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            stream_http: Client::new(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the server push channel.
    pub fn events_stream_url(&self) -> String {
        format!("{}/v1/events/stream", self.base_url)
    }

    pub(crate) async fn bearer(&self) -> CarewatchResult<String> {
        self.store
            .bearer_token()
            .await
            .ok_or(CarewatchError::NotAuthenticated)
    }

    /// Request builder for the durable push subscription.
    pub(crate) async fn events_request(&self) -> CarewatchResult<reqwest::RequestBuilder> {
        let token = self.bearer().await?;
        Ok(self
            .stream_http
            .get(self.events_stream_url())
            .bearer_auth(token)
            .header("Accept", "text/event-stream"))
    }

    /// Fetch the full room-directory snapshot.
    pub async fn rooms_snapshot(&self) -> CarewatchResult<RoomsSnapshot> {
        let token = self.bearer().await?;

        let response = self
            .http
            .get(format!("{}/v1/livekit/rooms", self.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CarewatchError::SnapshotFetchFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let snapshot = response
                    .json::<RoomsSnapshot>()
                    .await
                    .map_err(|e| CarewatchError::MalformedResponse(e.to_string()))?;
                debug!(
                    "Fetched room snapshot: {} rooms, {} participants",
                    snapshot.rooms.len(),
                    snapshot.total_participants
                );
                Ok(snapshot)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CarewatchError::AuthRejected(response.status().to_string()))
            }
            status => Err(CarewatchError::SnapshotFetchFailed(format!(
                "status {}",
                status
            ))),
        }
    }

    /// Request a room-scoped host credential for the signed-in operator.
    pub async fn issue_room_token(&self, room_name: &str) -> CarewatchResult<RtcTokenGrant> {
        let token = self.bearer().await?;

        let response = self
            .http
            .post(format!("{}/v1/rtc/token", self.base_url))
            .bearer_auth(&token)
            .json(&RtcTokenRequest {
                room_name: room_name.to_string(),
                role: "host".to_string(),
            })
            .send()
            .await
            .map_err(|e| CarewatchError::CredentialIssueFailed {
                room: room_name.to_string(),
                message: e.to_string(),
            })?;

        match response.status() {
            status if status.is_success() => response
                .json::<RtcTokenResponse>()
                .await
                .map_err(|e| CarewatchError::MalformedResponse(e.to_string()))?
                .into_grant(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CarewatchError::AuthRejected(response.status().to_string()))
            }
            status => Err(CarewatchError::CredentialIssueFailed {
                room: room_name.to_string(),
                message: format!("status {}", status),
            }),
        }
    }

    /// Resolve the signed-in operator's identity from `GET {api}/admin/me`.
    pub async fn fetch_operator(&self) -> CarewatchResult<OperatorIdentity> {
        let token = self.bearer().await?;

        let response = self
            .http
            .get(format!("{}/admin/me", self.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CarewatchError::ApiRequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<AdminMeResponse>()
                .await
                .map_err(|e| CarewatchError::MalformedResponse(e.to_string()))?
                .into_identity(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CarewatchError::AuthRejected(response.status().to_string()))
            }
            status => Err(CarewatchError::ApiRequestFailed(format!(
                "status {}",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenStore;
    use wiremock::matchers::{bearer_token, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AdminApiClient {
        AdminApiClient::new(server.uri(), Arc::new(StaticTokenStore::new("tok-1")))
    }

    #[tokio::test]
    async fn test_rooms_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/livekit/rooms"))
            .and(bearer_token("tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "livekitUrl": "wss://rtc.example.com",
                "totalRooms": 1,
                "totalParticipants": 1,
                "rooms": [{"name": "room1", "participants": [{"identity": "user_1", "name": "Edna"}]}]
            })))
            .mount(&server)
            .await;

        let snapshot = client_for(&server).rooms_snapshot().await.unwrap();
        assert_eq!(snapshot.rooms.len(), 1);
        assert!(snapshot.rooms[0].has_visitors());
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_request() {
        let server = MockServer::start().await;
        let client = AdminApiClient::new(server.uri(), Arc::new(StaticTokenStore::empty()));

        let err = client.rooms_snapshot().await.unwrap_err();
        assert!(matches!(err, CarewatchError::NotAuthenticated));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_issue_room_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rtc/token"))
            .and(body_json(serde_json::json!({
                "roomName": "room1",
                "role": "host"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "jwt-room1",
                "livekitUrl": "wss://rtc.example.com"
            })))
            .mount(&server)
            .await;

        let grant = client_for(&server).issue_room_token("room1").await.unwrap();
        assert_eq!(grant.token, "jwt-room1");
        assert_eq!(grant.livekit_url, "wss://rtc.example.com");
    }

    #[tokio::test]
    async fn test_issue_room_token_missing_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rtc/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"livekitUrl": "wss://rtc.example.com"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .issue_room_token("room1")
            .await
            .unwrap_err();
        assert!(matches!(err, CarewatchError::MalformedResponse(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_forbidden_token_maps_to_auth_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rtc/token"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .issue_room_token("room1")
            .await
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_server_error_is_transient_credential_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rtc/token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .issue_room_token("room2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CarewatchError::CredentialIssueFailed { .. }
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_fetch_operator() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "admin": {"id": "42", "name": "Pat"}
            })))
            .mount(&server)
            .await;

        let identity = client_for(&server).fetch_operator().await.unwrap();
        assert_eq!(identity.identity(), "admin_42");
        assert_eq!(identity.display_name, "Pat");
    }
}
