//! Event fan-out to room members.

use std::sync::Arc;

use hearth_protocol::{ConnectionId, Event, RoomCode};
use tokio::sync::mpsc;

use crate::{RoomError, RoomStore};

/// Channel sender carrying events toward one connection.
///
/// Unbounded on purpose: a send is a non-blocking queue push, so the
/// broadcaster can deliver without ever suspending (the connection's
/// writer side drains the queue onto the socket at its own pace), and
/// the only failure mode is "receiver gone".
pub type EventSink = mpsc::UnboundedSender<Event>;

/// A single recipient could not be reached: its receiver is gone.
///
/// Constructed, logged, and dropped inside the broadcaster — it never
/// escapes, and it never triggers a leave. Removing dead members is
/// solely the disconnect path's job; doing it here too would race that
/// path into double removal.
#[derive(Debug, thiserror::Error)]
#[error("delivery to {connection_id} failed: receiver gone")]
pub struct DeliveryFailed {
    /// The unreachable recipient.
    pub connection_id: ConnectionId,
}

/// Delivers events to every member of a room, in join order.
///
/// Cheap to clone; holds only a handle to the store.
#[derive(Clone)]
pub struct EventBroadcaster {
    store: Arc<RoomStore>,
}

impl EventBroadcaster {
    /// Creates a broadcaster over the given store.
    pub fn new(store: Arc<RoomStore>) -> Self {
        Self { store }
    }

    /// Delivers `event` to every current member of the room, in
    /// ascending join order. Returns the number of members reached.
    ///
    /// Delivery is best-effort per recipient: one dead receiver is
    /// logged and skipped, the rest still get the event. Events for
    /// different rooms are not ordered relative to each other.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] if the room does not exist.
    pub async fn broadcast(&self, code: &RoomCode, event: Event) -> Result<usize, RoomError> {
        let room = self.store.get(code).await?;

        // Snapshot under the room lock, send after releasing it.
        let recipients = room.delivery_snapshot().await;

        let mut delivered = 0;
        for (connection_id, sink) in recipients {
            match deliver(connection_id, &sink, event.clone()) {
                Ok(()) => delivered += 1,
                Err(failure) => {
                    tracing::warn!(room_code = %code, error = %failure, "skipping recipient");
                }
            }
        }

        tracing::debug!(room_code = %code, delivered, "broadcast complete");
        Ok(delivered)
    }
}

/// Pushes one event into one sink.
fn deliver(
    connection_id: ConnectionId,
    sink: &EventSink,
    event: Event,
) -> Result<(), DeliveryFailed> {
    sink.send(event).map_err(|_| DeliveryFailed { connection_id })
}
