//! Realtime fan-out broker.
//!
//! The core publishes serde-tagged envelopes here after commit; every
//! connected client session for a room holds a broadcast receiver. The broker
//! is the publish/subscribe seam: delivery transports (websocket, SSE) sit
//! outside the core and only ever consume receivers.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

/// Per-room channel capacity. Slow subscribers that fall further behind than
/// this see a Lagged error and must refetch the snapshot.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// Room row changed; clients refetch the snapshot at this version.
    RoomStateChanged { room_id: i64, lock_version: i32 },
    /// A chat message was appended.
    ChatPosted { room_id: i64, message_id: i64 },
    /// The presence sweep removed a player.
    PlayerEvicted { room_id: i64, player_id: String },
}

impl RoomEvent {
    pub fn room_id(&self) -> i64 {
        match self {
            RoomEvent::RoomStateChanged { room_id, .. }
            | RoomEvent::ChatPosted { room_id, .. }
            | RoomEvent::PlayerEvicted { room_id, .. } => *room_id,
        }
    }
}

pub struct RealtimeBroker {
    channels: DashMap<i64, broadcast::Sender<RoomEvent>>,
}

impl RealtimeBroker {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to a room's event stream.
    pub fn subscribe(&self, room_id: i64) -> broadcast::Receiver<RoomEvent> {
        self.channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to everyone subscribed to its room.
    ///
    /// Publishing with no subscribers is a no-op; events are change
    /// notifications, not a durable log.
    pub fn publish(&self, event: RoomEvent) {
        let room_id = event.room_id();
        if let Some(sender) = self.channels.get(&room_id) {
            let delivered = sender.send(event).unwrap_or(0);
            debug!(room_id, delivered, "room event published");
        }
    }

    /// Publish a room-changed notification for a fresh lock version.
    pub fn publish_room_state(&self, room_id: i64, lock_version: i32) {
        self.publish(RoomEvent::RoomStateChanged {
            room_id,
            lock_version,
        });
    }

    /// Drop a room's channel once the room is gone.
    pub fn forget_room(&self, room_id: i64) {
        self.channels.remove(&room_id);
    }
}

impl Default for RealtimeBroker {
    fn default() -> Self {
        Self::new()
    }
}
