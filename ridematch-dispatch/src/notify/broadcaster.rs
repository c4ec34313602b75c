//! SSE notification hub
//!
//! A single broadcast channel carries every notification tagged with its
//! target channel. Each SSE connection subscribes and keeps only the events
//! addressed to its own chair or user.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use ridematch_common::events::{Channel, RideNotification};
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::NotificationDispatcher;

/// SSE event name used for every ride status notification
pub const RIDE_STATUS_EVENT: &str = "RideStatus";

/// A notification addressed to one channel
#[derive(Debug, Clone, Serialize)]
pub struct ChannelEvent {
    /// Event ID for client reconnection
    pub id: String,
    pub channel: Channel,
    pub payload: RideNotification,
}

/// Broadcast-backed notification dispatcher serving SSE clients
#[derive(Clone)]
pub struct SseNotifier {
    tx: broadcast::Sender<ChannelEvent>,
}

impl SseNotifier {
    /// Create a notifier buffering up to `capacity` undelivered events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("SSE notifier initialized with capacity {}", capacity);
        Self { tx }
    }

    /// Raw receiver over every channel's events
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.tx.subscribe()
    }

    /// Number of connected subscribers across all channels
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Event stream for one channel's subscriber
    pub fn subscribe_stream(&self, channel: Channel) -> impl Stream<Item = Result<Event, Infallible>> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(move |result| {
            let channel = channel.clone();
            async move {
                match result {
                    Ok(event) if event.channel == channel => Event::default()
                        .event(RIDE_STATUS_EVENT)
                        .id(event.id)
                        .json_data(&event.payload)
                        .ok()
                        .map(Ok),
                    Ok(_) => None,
                    Err(e) => {
                        // Lagged subscriber; the next status supersedes what was missed
                        warn!("SSE client on {} error: {:?}", channel, e);
                        None
                    }
                }
            }
        })
    }

    /// Axum SSE response for a channel subscriber
    pub fn handle_sse_connection(&self, channel: Channel) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        info!(
            "New SSE client connected to {}, total clients: {}",
            channel,
            self.client_count() + 1
        );

        Sse::new(self.subscribe_stream(channel)).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive"),
        )
    }
}

impl NotificationDispatcher for SseNotifier {
    fn send(&self, channel: &Channel, notification: &RideNotification) {
        let event = ChannelEvent {
            id: Uuid::new_v4().to_string(),
            channel: channel.clone(),
            payload: notification.clone(),
        };
        match self.tx.send(event) {
            Ok(count) => debug!("Sent {} to {} ({} subscribers)", notification.status, channel, count),
            // No subscribers is fine; nobody is listening on this channel yet
            Err(_) => debug!("Dropped {} for {}: no subscribers", notification.status, channel),
        }
    }
}
