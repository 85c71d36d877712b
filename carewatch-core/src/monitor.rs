use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex, RwLock};
use tracing::{error, info, warn};

use crate::api::AdminApiClient;
use crate::auth::{CredentialProvider, TokenStore};
use crate::config::CarewatchConfig;
use crate::directory::RoomDirectoryFeed;
use crate::error::CarewatchResult;
use crate::pool::SessionPoolManager;
use crate::roster::RosterAggregator;

/// Snapshot of the monitor's lifecycle state for the UI layer.
#[derive(Debug, Clone, Default)]
pub struct MonitorStatus {
    pub running: bool,
    pub authenticated: bool,
    pub last_error: Option<String>,
}

/// Wires the room directory feed, session pool, and roster together.
///
/// `start()` resolves the operator identity, seeds the directory feed, and
/// spawns a loop that reconciles the session pool on every committed room
/// snapshot. An authentication rejection anywhere stops join activity and is
/// surfaced through [`MonitorStatus`] for the console's re-login flow;
/// transient failures stay inside their component.
pub struct CallMonitor {
    feed: Arc<RoomDirectoryFeed>,
    pool: Arc<SessionPoolManager>,
    roster: Arc<RosterAggregator>,
    credentials: Arc<CredentialProvider>,
    status: Arc<RwLock<MonitorStatus>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl CallMonitor {
    pub fn new(config: &CarewatchConfig, store: Arc<dyn TokenStore>) -> Self {
        let client = Arc::new(AdminApiClient::with_timeout(
            config.api.base_url.clone(),
            store,
            Duration::from_secs(config.api.request_timeout_secs),
        ));
        Self::with_client(client)
    }

    pub fn with_client(client: Arc<AdminApiClient>) -> Self {
        let credentials = Arc::new(CredentialProvider::new(client.clone()));
        Self {
            feed: Arc::new(RoomDirectoryFeed::new(client.clone())),
            pool: Arc::new(SessionPoolManager::new(client, credentials.clone())),
            roster: Arc::new(RosterAggregator::new()),
            credentials,
            status: Arc::new(RwLock::new(MonitorStatus::default())),
            shutdown_tx: Mutex::new(None),
        }
    }

    pub fn directory(&self) -> &Arc<RoomDirectoryFeed> {
        &self.feed
    }

    pub fn pool(&self) -> &Arc<SessionPoolManager> {
        &self.pool
    }

    pub fn roster(&self) -> &Arc<RosterAggregator> {
        &self.roster
    }

    pub fn credentials(&self) -> &Arc<CredentialProvider> {
        &self.credentials
    }

    pub async fn status(&self) -> MonitorStatus {
        self.status.read().await.clone()
    }

    pub async fn start(&self) -> CarewatchResult<()> {
        {
            let status = self.status.read().await;
            if status.running {
                return Err(crate::error::CarewatchError::Internal(
                    "Call monitor already running".to_string(),
                ));
            }
        }

        // Both checks bubble auth errors so the console can redirect to
        // login instead of spinning against a dead session.
        self.credentials.bearer_token().await?;
        let identity = self.credentials.resolve_identity().await?;
        self.roster.set_operator(identity).await;

        {
            let mut status = self.status.write().await;
            status.running = true;
            status.authenticated = true;
            status.last_error = None;
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        *self.shutdown_tx.lock().await = Some(shutdown_tx);

        // Subscribe before the feed starts so the initial snapshot commit is
        // observed by the reconcile loop.
        let mut rooms_rx = self.feed.subscribe();
        self.feed.start().await?;

        let pool = self.pool.clone();
        let roster = self.roster.clone();
        let status = self.status.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    changed = rooms_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let rooms = rooms_rx.borrow_and_update().clone();
                        match pool.reconcile(&rooms).await {
                            Ok(outcome) => {
                                for room in &outcome.left {
                                    roster.remove_room(room).await;
                                }
                            }
                            Err(e) if e.is_auth_error() => {
                                error!("Session rejected, operator must sign in again: {}", e);
                                let mut status = status.write().await;
                                status.authenticated = false;
                                status.last_error = Some(e.to_string());
                                break;
                            }
                            Err(e) => warn!("Reconciliation failed: {}", e),
                        }
                    }
                }
            }
            info!("Reconcile loop stopped");
        });

        info!("Call monitor started");
        Ok(())
    }

    pub async fn stop(&self) {
        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }

        self.feed.stop().await;
        self.pool.clear().await;

        let mut status = self.status.write().await;
        status.running = false;

        info!("Call monitor stopped");
    }
}
