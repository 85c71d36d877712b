use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::AdminApiClient;
use crate::auth::CredentialProvider;
use crate::error::CarewatchResult;
use crate::models::{RoomDescriptor, SessionConnection};

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub joined: Vec<String>,
    pub left: Vec<String>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty()
    }
}

/// Keeps exactly one active realtime session per qualifying room.
///
/// A room qualifies while it has at least one participant classified as a
/// real visitor; rooms holding only operators and automated participants are
/// never joined. The pool map is mutated only by [`reconcile`], which runs on
/// every directory change — reconciliation with an unchanged qualifying set
/// is a no-op, so duplicate joins cannot happen and a closed room cannot
/// leave a session behind.
///
/// [`reconcile`]: SessionPoolManager::reconcile
pub struct SessionPoolManager {
    client: Arc<AdminApiClient>,
    credentials: Arc<CredentialProvider>,
    sessions: RwLock<HashMap<String, SessionConnection>>,
    // Join order; the grid assigns slots positionally from it.
    order: RwLock<Vec<String>>,
}

impl SessionPoolManager {
    pub fn new(client: Arc<AdminApiClient>, credentials: Arc<CredentialProvider>) -> Self {
        Self {
            client,
            credentials,
            sessions: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Active sessions in join order.
    pub async fn connections(&self) -> Vec<SessionConnection> {
        let sessions = self.sessions.read().await;
        let order = self.order.read().await;
        order
            .iter()
            .filter_map(|name| sessions.get(name).cloned())
            .collect()
    }

    pub async fn contains(&self, room_name: &str) -> bool {
        self.sessions.read().await.contains_key(room_name)
    }

    /// The resolved operator identity the pool filters against, if any.
    pub async fn operator_identity(&self) -> Option<crate::models::OperatorIdentity> {
        self.credentials.operator_identity().await
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop every session. Pure local state transition, used on teardown.
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
        self.order.write().await.clear();
    }

    /// Reconcile the pool against the latest room list.
    ///
    /// Abstains silently while the operator identity is unresolved or no
    /// session token is present. Per-room credential failures are logged and
    /// skipped — the room stays unjoined until the next directory change
    /// provides the retry. Only an authentication rejection propagates, since
    /// that must stop all join activity and send the operator back to login.
    pub async fn reconcile(&self, rooms: &[RoomDescriptor]) -> CarewatchResult<ReconcileOutcome> {
        if self.credentials.operator_identity().await.is_none() {
            debug!("Operator identity not yet resolved, skipping reconciliation");
            return Ok(ReconcileOutcome::default());
        }
        if self.credentials.bearer_token().await.is_err() {
            debug!("No session token, skipping reconciliation");
            return Ok(ReconcileOutcome::default());
        }

        let qualifying: HashSet<&str> = rooms
            .iter()
            .filter(|room| room.has_visitors())
            .map(|room| room.name.as_str())
            .collect();

        let mut outcome = ReconcileOutcome::default();

        // Leaves first: covers both "room closed" and "last visitor left".
        let to_leave: Vec<String> = {
            let sessions = self.sessions.read().await;
            sessions
                .keys()
                .filter(|name| !qualifying.contains(name.as_str()))
                .cloned()
                .collect()
        };

        for name in to_leave {
            self.sessions.write().await.remove(&name);
            self.order.write().await.retain(|n| n != &name);
            info!("Left room '{}'", name);
            outcome.left.push(name);
        }

        // Joins in directory order. Existing sessions are left untouched; a
        // persisting room is never torn down and rejoined.
        for room in rooms {
            if !qualifying.contains(room.name.as_str()) {
                continue;
            }
            if self.sessions.read().await.contains_key(&room.name) {
                continue;
            }

            match self.client.issue_room_token(&room.name).await {
                Ok(grant) => {
                    let session =
                        SessionConnection::new(&room.name, grant.token, grant.livekit_url);
                    self.sessions
                        .write()
                        .await
                        .insert(room.name.clone(), session);
                    self.order.write().await.push(room.name.clone());
                    info!(
                        "Joined room '{}' ({} visitors)",
                        room.name,
                        room.visitor_count()
                    );
                    outcome.joined.push(room.name.clone());
                }
                Err(e) if e.is_auth_error() => return Err(e),
                Err(e) => {
                    // Retried on the next reconciliation pass; the directory
                    // feed's own re-fetch cadence provides the pressure.
                    warn!("Join failed for room '{}': {}", room.name, e);
                }
            }
        }

        Ok(outcome)
    }
}
