//! Ride status notifications
//!
//! The engine hands every committed match to a `NotificationDispatcher`,
//! once for the chair's channel and once for the user's. Delivery is
//! fire-and-forget: the engine never waits for or checks it.

pub mod broadcaster;

pub use broadcaster::{ChannelEvent, SseNotifier};

use ridematch_common::events::{Channel, RideNotification};

/// Sink for ride status notifications
pub trait NotificationDispatcher: Send + Sync {
    /// Queue `notification` for delivery on `channel`
    fn send(&self, channel: &Channel, notification: &RideNotification);
}
