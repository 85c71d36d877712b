use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::api::AdminApiClient;
use crate::error::CarewatchResult;
use crate::models::OperatorIdentity;

/// Resolves and exposes the operator's bearer token and stable identity.
///
/// The identity comes from the admin API's "who am I" endpoint and is cached
/// in memory for the provider's lifetime. Components that join rooms or
/// filter rosters must not act until it has resolved, since the operator's
/// own identity is what gets filtered out of participant lists.
pub struct CredentialProvider {
    client: Arc<AdminApiClient>,
    identity: RwLock<Option<OperatorIdentity>>,
}

impl CredentialProvider {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self {
            client,
            identity: RwLock::new(None),
        }
    }

    /// The persisted session token, or `NotAuthenticated` when the external
    /// store has nothing. Callers treat that as "defer to the login flow",
    /// never retry.
    pub async fn bearer_token(&self) -> CarewatchResult<String> {
        self.client.bearer().await
    }

    /// The cached operator identity, if already resolved.
    pub async fn operator_identity(&self) -> Option<OperatorIdentity> {
        self.identity.read().await.clone()
    }

    /// Resolve the operator identity from the admin API, caching the result.
    pub async fn resolve_identity(&self) -> CarewatchResult<OperatorIdentity> {
        if let Some(identity) = self.identity.read().await.clone() {
            return Ok(identity);
        }

        let resolved = self.client.fetch_operator().await?;
        info!(
            "Resolved operator identity: {} ({})",
            resolved.identity(),
            resolved.display_name
        );

        let mut cache = self.identity.write().await;
        *cache = Some(resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenStore;
    use crate::error::CarewatchError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_bearer_token_requires_session() {
        let client = Arc::new(AdminApiClient::new(
            "http://localhost:0",
            Arc::new(StaticTokenStore::empty()),
        ));
        let provider = CredentialProvider::new(client);

        let err = provider.bearer_token().await.unwrap_err();
        assert!(matches!(err, CarewatchError::NotAuthenticated));
        assert!(provider.operator_identity().await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_identity_caches_single_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "admin": {"id": "7", "email": "sam@example.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = Arc::new(AdminApiClient::new(
            server.uri(),
            Arc::new(StaticTokenStore::new("tok-1")),
        ));
        let provider = CredentialProvider::new(client);

        let first = provider.resolve_identity().await.unwrap();
        let second = provider.resolve_identity().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.operator_identity().await, Some(first));
    }
}
