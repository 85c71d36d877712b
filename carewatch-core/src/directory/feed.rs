use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{oneshot, watch, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::api::{AdminApiClient, RoomsSnapshot};
use crate::error::{CarewatchError, CarewatchResult};
use crate::models::RoomDescriptor;

use super::stream::run_event_stream;

#[derive(Debug, Clone, Default)]
struct DirectoryState {
    rooms: Vec<RoomDescriptor>,
    loading: bool,
    error: Option<String>,
}

/// Live list of currently active call rooms.
///
/// Seeds itself with one full snapshot fetch, then holds a durable push
/// subscription open; every room-scoped event triggers a full snapshot
/// re-fetch that replaces the entire room list. Partial participant deltas
/// from the push channel are never applied — full replacement keeps the list
/// consistent with the snapshot endpoint without ordering guarantees between
/// the two.
///
/// Overlapping re-fetches are allowed; a monotonically increasing sequence
/// number gates commits so the last-issued fetch wins and a slow superseded
/// response is discarded instead of clobbering newer state.
pub struct RoomDirectoryFeed {
    client: Arc<AdminApiClient>,
    state: Arc<RwLock<DirectoryState>>,
    rooms_tx: watch::Sender<Vec<RoomDescriptor>>,
    fetch_seq: AtomicU64,
    running: Arc<RwLock<bool>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl RoomDirectoryFeed {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        let (rooms_tx, _) = watch::channel(Vec::new());
        Self {
            client,
            state: Arc::new(RwLock::new(DirectoryState {
                loading: true,
                ..Default::default()
            })),
            rooms_tx,
            fetch_seq: AtomicU64::new(0),
            running: Arc::new(RwLock::new(false)),
            shutdown_tx: Mutex::new(None),
        }
    }

    /// The latest fully-replaced room list.
    pub async fn rooms(&self) -> Vec<RoomDescriptor> {
        self.state.read().await.rooms.clone()
    }

    /// True until the first snapshot commit (or first failure).
    pub async fn loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// User-facing banner text for a failed snapshot fetch, if any. Stream
    /// reconnects never surface here.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Receiver over the room list for downstream consumers; fires on every
    /// committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<RoomDescriptor>> {
        self.rooms_tx.subscribe()
    }

    pub(super) fn client(&self) -> &Arc<AdminApiClient> {
        &self.client
    }

    /// Seed state with an initial snapshot and open the push subscription.
    pub async fn start(self: &Arc<Self>) -> CarewatchResult<()> {
        let mut running = self.running.write().await;
        if *running {
            return Err(CarewatchError::Internal(
                "Directory feed already running".to_string(),
            ));
        }
        *running = true;
        drop(running);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.shutdown_tx.lock().await = Some(shutdown_tx);

        // Initial snapshot; a failure surfaces as `error` and the stream task
        // still starts so recovery happens on the next directory event.
        self.refetch().await;

        let feed = self.clone();
        tokio::spawn(async move {
            run_event_stream(feed, shutdown_rx).await;
        });

        info!("Room directory feed started");
        Ok(())
    }

    /// Close the subscription and fence out any in-flight fetch. No state
    /// commit can land after this returns.
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
        drop(running);

        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }

        // Invalidate every outstanding sequence number so late responses are
        // discarded by the commit gate.
        self.fetch_seq.fetch_add(1, Ordering::SeqCst);

        info!("Room directory feed stopped");
    }

    /// Fetch a fresh snapshot and commit it if still the latest request.
    pub async fn refetch(&self) {
        let seq = self.begin_fetch();
        let result = self.client.rooms_snapshot().await;
        self.commit_snapshot(seq, result).await;
    }

    fn begin_fetch(&self) -> u64 {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a fetch result. Returns false when the result was discarded as
    /// superseded or failed.
    async fn commit_snapshot(&self, seq: u64, result: CarewatchResult<RoomsSnapshot>) -> bool {
        let mut state = self.state.write().await;

        if seq != self.fetch_seq.load(Ordering::SeqCst) {
            debug!("Discarding superseded room snapshot (seq {})", seq);
            return false;
        }

        state.loading = false;
        match result {
            Ok(snapshot) => {
                state.error = None;
                state.rooms = snapshot.rooms.clone();
                drop(state);
                let _ = self.rooms_tx.send(snapshot.rooms);
                true
            }
            Err(e) => {
                // Stale-but-present data beats a blank grid: keep the
                // previous rooms and only surface the banner text.
                warn!("Room snapshot fetch failed: {}", e);
                state.error = Some(e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenStore;
    use crate::models::ParticipantDescriptor;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_for(server: &MockServer) -> Arc<RoomDirectoryFeed> {
        let client = Arc::new(AdminApiClient::new(
            server.uri(),
            Arc::new(StaticTokenStore::new("tok-1")),
        ));
        Arc::new(RoomDirectoryFeed::new(client))
    }

    fn snapshot_with_room(name: &str) -> RoomsSnapshot {
        RoomsSnapshot {
            rooms: vec![RoomDescriptor::new(name)
                .with_participants(vec![ParticipantDescriptor::new("user_1", "Edna")])],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_refetch_replaces_rooms_wholesale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/livekit/rooms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rooms": [{"name": "room1", "participants": [{"identity": "user_1", "name": "Edna"}]}]
            })))
            .mount(&server)
            .await;

        let feed = feed_for(&server);
        assert!(feed.loading().await);

        feed.refetch().await;

        assert!(!feed.loading().await);
        assert!(feed.error().await.is_none());
        let rooms = feed.rooms().await;
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "room1");
    }

    #[tokio::test]
    async fn test_fetch_failure_retains_stale_rooms() {
        let server = MockServer::start().await;
        let ok_mock = Mock::given(method("GET"))
            .and(path("/v1/livekit/rooms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rooms": [{"name": "room1", "participants": []}]
            })))
            .expect(1)
            .mount_as_scoped(&server)
            .await;

        let feed = feed_for(&server);
        feed.refetch().await;
        assert_eq!(feed.rooms().await.len(), 1);
        drop(ok_mock);

        Mock::given(method("GET"))
            .and(path("/v1/livekit/rooms"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        feed.refetch().await;

        // The banner is set but the previous room list is still served.
        assert!(feed.error().await.is_some());
        assert_eq!(feed.rooms().await.len(), 1);
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_discarded() {
        let server = MockServer::start().await;
        let feed = feed_for(&server);

        let seq_a = feed.begin_fetch();
        let seq_b = feed.begin_fetch();

        // B (the later request) resolves first and wins.
        assert!(feed.commit_snapshot(seq_b, Ok(snapshot_with_room("room-b"))).await);

        // A resolves afterwards and must be discarded.
        assert!(!feed.commit_snapshot(seq_a, Ok(snapshot_with_room("room-a"))).await);

        let rooms = feed.rooms().await;
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "room-b");
    }

    #[tokio::test]
    async fn test_stop_fences_in_flight_fetch() {
        let server = MockServer::start().await;
        let feed = feed_for(&server);

        let seq = feed.begin_fetch();
        feed.stop().await;

        assert!(!feed.commit_snapshot(seq, Ok(snapshot_with_room("room1"))).await);
        assert!(feed.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_sees_committed_snapshots() {
        let server = MockServer::start().await;
        let feed = feed_for(&server);
        let mut rx = feed.subscribe();

        let seq = feed.begin_fetch();
        feed.commit_snapshot(seq, Ok(snapshot_with_room("room1"))).await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
