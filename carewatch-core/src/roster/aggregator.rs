use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::models::{classify_identity, IdentityClass, OperatorIdentity};

/// Live participant state as reported by the realtime transport for one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveParticipant {
    pub identity: String,
    pub name: String,
    pub speaking: bool,
    pub muted: bool,
    pub camera_off: bool,
}

impl LiveParticipant {
    pub fn new(identity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            name: name.into(),
            speaking: false,
            muted: false,
            camera_off: false,
        }
    }
}

/// View model for one roster entry. Derived, rebuilt per room per update,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedParticipant {
    pub id: String,
    pub name: String,
    pub speaking: bool,
    pub muted: bool,
    pub camera_off: bool,
    pub is_local_operator: bool,
    pub online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Per-room notification invoked after a room's roster actually changed.
pub type RosterCallback = Arc<dyn Fn(&[AggregatedParticipant]) + Send + Sync>;

/// Merges each session's live participant list into one cross-session roster.
///
/// State is keyed by room name so concurrent per-room updates interleave
/// without clobbering other rooms' entries. Before a new list is accepted it
/// is shallow-compared against the stored one; structurally equal updates are
/// discarded without any downstream notification, so transport change events
/// with no semantic difference don't churn the UI.
pub struct RosterAggregator {
    rooms: RwLock<HashMap<String, Vec<AggregatedParticipant>>>,
    callbacks: RwLock<HashMap<String, RosterCallback>>,
    operator: RwLock<Option<OperatorIdentity>>,
    roster_tx: watch::Sender<Vec<AggregatedParticipant>>,
}

impl RosterAggregator {
    pub fn new() -> Self {
        let (roster_tx, _) = watch::channel(Vec::new());
        Self {
            rooms: RwLock::new(HashMap::new()),
            callbacks: RwLock::new(HashMap::new()),
            operator: RwLock::new(None),
            roster_tx,
        }
    }

    /// Set the resolved operator identity used to tag `is_local_operator`.
    pub async fn set_operator(&self, identity: OperatorIdentity) {
        *self.operator.write().await = Some(identity);
    }

    /// Register the per-room callback. One callback per room; registering
    /// again replaces the previous one.
    pub async fn on_room_update(&self, room_name: impl Into<String>, callback: RosterCallback) {
        self.callbacks.write().await.insert(room_name.into(), callback);
    }

    /// Drop a room's roster and callback, e.g. after its session left the
    /// pool. Recomputes the merged roster.
    pub async fn remove_room(&self, room_name: &str) {
        self.callbacks.write().await.remove(room_name);
        let removed = self.rooms.write().await.remove(room_name);
        if removed.is_some() {
            self.publish_merged().await;
        }
    }

    /// Apply one transport-reported participant list for a room.
    ///
    /// Returns true when the update was applied, false when it was discarded
    /// as a structural duplicate of the stored list.
    pub async fn submit_update(&self, room_name: &str, live: Vec<LiveParticipant>) -> bool {
        let operator = self.operator.read().await.clone();
        let projected: Vec<AggregatedParticipant> = live
            .iter()
            .filter(|p| classify_identity(&p.identity) == IdentityClass::Visitor)
            .map(|p| project(p, operator.as_ref()))
            .collect();

        {
            let rooms = self.rooms.read().await;
            if let Some(current) = rooms.get(room_name) {
                if lists_equal(current, &projected) {
                    debug!("Duplicate roster update for '{}', discarded", room_name);
                    return false;
                }
            } else if projected.is_empty() {
                // Nothing stored and nothing visible: still a no-op.
                return false;
            }
        }

        self.rooms
            .write()
            .await
            .insert(room_name.to_string(), projected.clone());

        if let Some(callback) = self.callbacks.read().await.get(room_name) {
            callback(&projected);
        }

        self.publish_merged().await;
        true
    }

    /// Roster for one room, in the transport's reported order.
    pub async fn room_roster(&self, room_name: &str) -> Vec<AggregatedParticipant> {
        self.rooms
            .read()
            .await
            .get(room_name)
            .cloned()
            .unwrap_or_default()
    }

    /// The flat cross-session roster: per-room lists concatenated, room
    /// order fixed by name for stable rendering.
    pub async fn merged_roster(&self) -> Vec<AggregatedParticipant> {
        let rooms = self.rooms.read().await;
        let mut names: Vec<&String> = rooms.keys().collect();
        names.sort();
        names
            .into_iter()
            .flat_map(|name| rooms[name].iter().cloned())
            .collect()
    }

    /// Receiver over the merged roster; fires on every applied update.
    pub fn subscribe(&self) -> watch::Receiver<Vec<AggregatedParticipant>> {
        self.roster_tx.subscribe()
    }

    async fn publish_merged(&self) {
        let merged = self.merged_roster().await;
        let _ = self.roster_tx.send(merged);
    }
}

impl Default for RosterAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn project(live: &LiveParticipant, operator: Option<&OperatorIdentity>) -> AggregatedParticipant {
    AggregatedParticipant {
        id: live.identity.clone(),
        name: live.name.clone(),
        speaking: live.speaking,
        muted: live.muted,
        camera_off: live.camera_off,
        is_local_operator: operator.is_some_and(|op| op.identity() == live.identity),
        online: true,
        last_seen: Some(Utc::now()),
    }
}

/// Shallow equality over the fields that matter for rendering: length plus
/// per-index id and media flags. Timestamps are ignored on purpose.
fn lists_equal(a: &[AggregatedParticipant], b: &[AggregatedParticipant]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| {
            x.id == y.id
                && x.muted == y.muted
                && x.camera_off == y.camera_off
                && x.speaking == y.speaking
        })
}
