use std::sync::Arc;

use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::api::StreamEvent;

use super::feed::RoomDirectoryFeed;

/// Drive the durable push subscription until shutdown.
///
/// Transport errors are left to `EventSource`'s retry policy and logged at
/// debug level only; reconnect attempts are never user-facing. Each
/// room-scoped event spawns a snapshot re-fetch, so bursts of events produce
/// concurrent fetches that the feed's sequence gate serializes.
pub(super) async fn run_event_stream(
    feed: Arc<RoomDirectoryFeed>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let request = match feed.client().events_request().await {
        Ok(request) => request,
        Err(e) => {
            warn!("Cannot open event stream without a session: {}", e);
            return;
        }
    };

    let mut es = match EventSource::new(request) {
        Ok(es) => es,
        Err(e) => {
            warn!("Failed to open event stream: {}", e);
            return;
        }
    };

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                es.close();
                debug!("Event stream subscription closed");
                break;
            }
            next = es.next() => match next {
                None => {
                    debug!("Event stream ended");
                    break;
                }
                Some(Ok(Event::Open)) => {
                    debug!("Event stream connected");
                }
                Some(Ok(Event::Message(message))) => {
                    handle_message(&feed, &message.data);
                }
                Some(Err(e)) => {
                    debug!("Event stream interrupted, reconnecting: {}", e);
                }
            }
        }
    }
}

fn handle_message(feed: &Arc<RoomDirectoryFeed>, data: &str) {
    let event: StreamEvent = match serde_json::from_str(data) {
        Ok(event) => event,
        Err(e) => {
            debug!("Ignoring unparseable stream event: {}", e);
            return;
        }
    };

    if !event.is_room_scoped() {
        return;
    }

    debug!(
        "Directory event '{}' for room {:?}, re-fetching snapshot",
        event.event_type, event.room_name
    );

    let feed = feed.clone();
    tokio::spawn(async move {
        feed.refetch().await;
    });
}
